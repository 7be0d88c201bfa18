use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::http::{self, AppState};
use crate::api::rpc::Dispatcher;
use crate::infra::gateway::SearchGateway;
use crate::tools::registry::build_registry;

/// `/healthz`, `GET /search` and JSON-RPC at `POST /mcp`, all over one gateway.
pub fn build_app(gateway: Arc<dyn SearchGateway>) -> Router {
    let dispatcher = Dispatcher::new(build_registry(gateway.clone()));
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/search", get(http::search))
        .route("/mcp", post(http::rpc))
        .with_state(AppState { dispatcher, gateway })
}
