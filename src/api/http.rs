use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::rpc::Dispatcher;
use crate::core::mcp::RpcResp;
use crate::domain::SearchOptions;
use crate::infra::gateway::SearchGateway;
use crate::tools::search::sanitize::sanitize;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub gateway: Arc<dyn SearchGateway>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub language: Option<String>,
    pub model: Option<String>,
}

pub enum ApiError {
    MissingQuery,
    Backend(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingQuery => (StatusCode::BAD_REQUEST, "Missing q parameter.".to_string()),
            ApiError::Backend(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// `GET /search?q=...` → `{answer, metadata}`.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or(ApiError::MissingQuery)?;
    let opts = SearchOptions { query, language: params.language, limit: None, model: params.model };
    tracing::debug!(query = %opts.query, "HTTP search invoked");

    let raw = state.gateway.invoke(&opts).await.map_err(|e| {
        tracing::error!(error = %e, "HTTP search failed");
        ApiError::Backend(e.to_string())
    })?;
    let clean = sanitize(&raw);
    Ok(Json(json!({ "answer": clean.answer, "metadata": clean.metadata })))
}

/// `POST /mcp`: one JSON-RPC envelope in, one out. The body is taken as raw
/// bytes so malformed JSON or UTF-8 becomes a -32700 envelope instead of an
/// HTTP rejection.
pub async fn rpc(State(state): State<AppState>, body: Bytes) -> Json<RpcResp> {
    Json(state.dispatcher.handle_bytes(&body).await)
}
