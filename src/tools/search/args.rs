//! Argument normalization for `tools/call`.
//!
//! Hosts serialize tool arguments inconsistently: a native object, the same
//! object JSON-encoded into a string, or a bare string when only the query
//! matters. The payload is classified once into [`ArgumentPayload`] and then
//! read into [`SearchOptions`].

use serde_json::{Map, Value as J};

use crate::core::error::GatewayError;
use crate::domain::SearchOptions;

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentPayload {
    /// Native JSON object.
    Structured(Map<String, J>),
    /// A string that held a JSON-encoded object.
    Encoded(Map<String, J>),
    /// A string used verbatim as the query.
    Literal(String),
    /// Null, number, bool or array: nothing to read a query from.
    Absent,
}

impl ArgumentPayload {
    /// Never fails: undecodable strings degrade to [`ArgumentPayload::Literal`].
    pub fn decode(raw: &J) -> Self {
        match raw {
            J::Object(map) => ArgumentPayload::Structured(map.clone()),
            J::String(s) => match serde_json::from_str::<J>(s) {
                Ok(J::Object(map)) => ArgumentPayload::Encoded(map),
                _ => ArgumentPayload::Literal(s.clone()),
            },
            _ => ArgumentPayload::Absent,
        }
    }

    pub fn into_options(self) -> Result<SearchOptions, GatewayError> {
        let opts = match self {
            ArgumentPayload::Structured(map) | ArgumentPayload::Encoded(map) => from_map(&map),
            ArgumentPayload::Literal(s) => SearchOptions::new(s),
            ArgumentPayload::Absent => SearchOptions::default(),
        };
        if opts.query.trim().is_empty() {
            return Err(GatewayError::InvalidParams("Missing required parameter: query".into()));
        }
        Ok(opts)
    }
}

/// Decode and normalize in one step.
pub fn normalize(raw: &J) -> Result<SearchOptions, GatewayError> {
    ArgumentPayload::decode(raw).into_options()
}

fn non_empty_str(map: &Map<String, J>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(J::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn from_map(map: &Map<String, J>) -> SearchOptions {
    let query = non_empty_str(map, "query")
        .or_else(|| non_empty_str(map, "q"))
        .unwrap_or_default();
    let limit = map.get("limit").and_then(|v| match v {
        J::Number(n) => n.as_i64(),
        J::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    SearchOptions {
        query,
        language: non_empty_str(map, "language"),
        limit,
        model: non_empty_str(map, "model"),
    }
}
