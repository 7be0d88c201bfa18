//! The `search` tool: web-grounded generative answers.

pub mod args;
pub mod sanitize;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::{json, Map, Value as J};

use crate::core::content::TextContent;
use crate::core::error::GatewayError;
use crate::core::tool::{Tool, ToolSpec};
use crate::infra::gateway::{SearchGateway, DEFAULT_LANGUAGE};

pub const TOOL_NAME: &str = "search";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_LIMIT: i64 = 10;

pub const MODELS: &[&str] = &[
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-2.0-flash",
    "gemini-2.5-flash",
    "gemini-2.5-pro",
];

/// Documented locales. Free-form tags outside this list are accepted.
pub const LANGUAGES: &[&str] = &[
    "en-US", "en-GB", "de-DE", "fr-FR", "es-ES", "it-IT", "pt-BR", "ja-JP", "ko-KR", "zh-CN",
];

static INPUT_SCHEMA: OnceLock<J> = OnceLock::new();

fn input_schema() -> &'static J {
    INPUT_SCHEMA.get_or_init(|| {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question or search query to answer"
                },
                "language": {
                    "type": "string",
                    "description": format!("Locale tag for the answer, e.g. one of: {}", LANGUAGES.join(", ")),
                    "default": DEFAULT_LANGUAGE
                },
                "limit": {
                    "type": "integer",
                    "description": "Advisory number of results",
                    "minimum": 1,
                    "maximum": 20,
                    "default": DEFAULT_LIMIT
                },
                "model": {
                    "type": "string",
                    "description": "Gemini model to answer with",
                    "enum": MODELS,
                    "default": DEFAULT_MODEL
                }
            },
            "required": ["query"]
        })
    })
}

#[derive(Clone)]
pub struct SearchTool {
    gateway: Arc<dyn SearchGateway>,
}

impl SearchTool {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self { gateway }
    }
}

impl ToolSpec for SearchTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }
    fn description(&self) -> &'static str {
        "Answer a query with Gemini, grounded in live Google Search results"
    }
    fn input_schema(&self) -> J {
        input_schema().clone()
    }
}

#[async_trait]
impl Tool for SearchTool {
    async fn call(&self, arguments: &J) -> Result<J, GatewayError> {
        let opts = args::normalize(arguments)?;
        tracing::debug!(query = %opts.query, model = ?opts.model, language = ?opts.language, "search invoked");

        let raw = self
            .gateway
            .invoke(&opts)
            .await
            .map_err(|e| GatewayError::SearchFailure(e.to_string()))?;
        let clean = sanitize::sanitize(&raw);
        let grounding = sanitize::grounding_info(clean.metadata.as_ref());

        let content = vec![
            TextContent::new(clean.answer.clone()),
            TextContent::json(clean.metadata.as_ref()),
            TextContent::json(clean.full_response.as_ref()),
        ];
        let mut out = Map::new();
        out.insert("content".into(), json!(content));
        out.insert("isError".into(), J::Bool(false));
        if let Some(md) = clean.metadata {
            out.insert("metadata".into(), md);
        }
        if let Some(full) = clean.full_response {
            out.insert("fullResponse".into(), full);
        }
        out.insert("groundingInfo".into(), json!(grounding));
        Ok(J::Object(out))
    }
}
