use serde::{Deserialize, Serialize};
use serde_json::Value as J;
use thiserror::Error;

/// Failure of the generative backend. The dispatcher never inspects the
/// variant, only the message.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("{0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SearchError::Decode(e.to_string())
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}

/// Canonical arguments of one `search` call. Built per call, consumed once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }
}

/// Raw bundle returned by the search gateway.
///
/// `full_response` is `{"candidates": [...], "usageMetadata": {...}}` as the
/// backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_response: Option<J>,
}

/// Convenience projection of grounding metadata. Fields are never null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingInfo {
    pub web_search_queries: Vec<J>,
    pub grounding_chunks: Vec<J>,
    pub grounding_supports: Vec<J>,
}
