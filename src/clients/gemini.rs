use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value as J};
use std::time::Instant;

use crate::domain::{SearchError, SearchResult};
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// REST client for `models/{model}:generateContent` with search grounding.
/// One instance is bound to one model.
#[derive(Clone)]
pub struct GeminiClient {
    base: String,
    api_key: String,
    model: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(base: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            api_key: api_key.into(),
            model: model.into(),
            http: make_http_client(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Same endpoint and credentials, different model.
    pub fn for_model(&self, model: impl Into<String>) -> Self {
        Self {
            base: self.base.clone(),
            api_key: self.api_key.clone(),
            model: model.into(),
            http: self.http.clone(),
        }
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!("{}/v1beta/models/{}:generateContent", self.base.trim_end_matches('/'), model)
    }

    pub async fn generate(&self, prompt: &str) -> Result<SearchResult, SearchError> {
        let url = self.endpoint();
        tracing::debug!(endpoint = %url, model = %self.model, "gemini.generate request");
        let start = Instant::now();
        let res = self.send(url, prompt).await;
        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_millis() as f64;
                crate::infra::logging::log_metric("search", "backend_latency_ms", elapsed_ms);
            }
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "gemini.generate failed");
                crate::infra::logging::log_metric("search", "backend_error_total", 1.0);
            }
        }
        res
    }

    async fn send(&self, url: String, prompt: &str) -> Result<SearchResult, SearchError> {
        let payload = GenerateReq {
            contents: vec![ContentWire { role: "user", parts: vec![PartWire { text: prompt }] }],
            tools: vec![grounding_tool(&self.model)],
        };
        let (builder, _rid) = add_standard_headers(self.http.post(url), None);
        let resp = builder
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&payload)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body).unwrap_or_else(|| format!("upstream status {status}")),
            });
        }
        let body: J = resp.json().await?;
        Ok(into_result(body))
    }
}

/// 1.5-series models only understand the legacy retrieval tool.
fn grounding_tool(model: &str) -> J {
    if model.trim_start_matches("models/").starts_with("gemini-1.5") {
        serde_json::json!({ "googleSearchRetrieval": {} })
    } else {
        serde_json::json!({ "googleSearch": {} })
    }
}

fn upstream_message(body: &str) -> Option<String> {
    let v: J = serde_json::from_str(body).ok()?;
    v.pointer("/error/message")
        .and_then(J::as_str)
        .map(str::to_owned)
}

fn into_result(body: J) -> SearchResult {
    let first = body.pointer("/candidates/0");
    let answer = first
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(J::as_array)
        .map(|parts| parts.iter().filter_map(|p| p.get("text").and_then(J::as_str)).collect::<String>())
        .unwrap_or_default();
    let metadata = first.and_then(|c| c.get("groundingMetadata")).cloned();

    let mut full = Map::new();
    for key in ["candidates", "usageMetadata"] {
        if let Some(v) = body.get(key) {
            full.insert(key.to_string(), v.clone());
        }
    }
    SearchResult { answer, metadata, full_response: Some(J::Object(full)) }
}

#[derive(Serialize)]
struct GenerateReq<'a> {
    contents: Vec<ContentWire<'a>>,
    tools: Vec<J>,
}

#[derive(Serialize)]
struct ContentWire<'a> {
    role: &'static str,
    parts: Vec<PartWire<'a>>,
}

#[derive(Serialize)]
struct PartWire<'a> {
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn grounded_body() -> J {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Rust 1.0 shipped "}, {"text": "in May 2015."}]},
                "groundingMetadata": {
                    "searchEntryPoint": {"renderedContent": "<style/>"},
                    "webSearchQueries": ["rust 1.0 release date"],
                    "groundingChunks": [{"web": {"uri": "https://blog.rust-lang.org", "title": "Rust Blog"}}]
                }
            }],
            "usageMetadata": {"promptTokenCount": 6, "totalTokenCount": 20}
        })
    }

    #[tokio::test]
    async fn it_posts_grounded_request_and_maps_answer() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.0-flash:generateContent")
                .header("x-goog-api-key", "k")
                .header_exists("x-request-id")
                .json_body(json!({
                    "contents": [{"role": "user", "parts": [{"text": "when was rust 1.0"}]}],
                    "tools": [{"googleSearch": {}}]
                }));
            then.status(200).json_body(grounded_body());
        });

        let cli = GeminiClient::new(server.base_url(), "k", "gemini-2.0-flash");
        let out = cli.generate("when was rust 1.0").await.unwrap();
        m.assert();

        assert_eq!(out.answer, "Rust 1.0 shipped in May 2015.");
        let md = out.metadata.unwrap();
        assert_eq!(md["webSearchQueries"][0], "rust 1.0 release date");
        let full = out.full_response.unwrap();
        assert_eq!(full["usageMetadata"]["totalTokenCount"], 20);
        assert!(full["candidates"].is_array());
    }

    #[tokio::test]
    async fn legacy_models_use_search_retrieval_tool() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash-latest:generateContent")
                .json_body_partial(r#"{"tools":[{"googleSearchRetrieval":{}}]}"#);
            then.status(200).json_body(json!({"candidates": []}));
        });
        let cli = GeminiClient::new(server.base_url(), "k", "gemini-1.5-flash-latest");
        let out = cli.generate("x").await.unwrap();
        m.assert();
        assert_eq!(out.answer, "");
        assert!(out.metadata.is_none());
    }

    #[tokio::test]
    async fn it_surfaces_backend_error_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(400).json_body(json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
            }));
        });
        let cli = GeminiClient::new(server.base_url(), "bad", "gemini-2.0-flash");
        let err = cli.generate("x").await.unwrap_err();
        assert_eq!(err.to_string(), "API key not valid. Please pass a valid API key.");
    }

    #[tokio::test]
    async fn it_falls_back_to_status_when_body_is_opaque() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(503).body("unavailable");
        });
        let cli = GeminiClient::new(server.base_url(), "k", "gemini-2.0-flash");
        let err = cli.generate("x").await.unwrap_err();
        assert!(err.to_string().contains("upstream status 503"));
    }

    #[test]
    fn for_model_keeps_endpoint_and_swaps_model() {
        let cli = GeminiClient::new("http://h/", "k", "gemini-1.5-flash-latest");
        let other = cli.for_model("models/gemini-2.5-pro");
        assert_eq!(other.endpoint(), "http://h/v1beta/models/gemini-2.5-pro:generateContent");
        assert_eq!(cli.model(), "gemini-1.5-flash-latest");
    }
}
