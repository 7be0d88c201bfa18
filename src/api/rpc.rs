//! JSON-RPC method dispatch shared by the stdio and HTTP transports.
//!
//! Requests are independent: nothing is carried from one to the next, and
//! every request yields exactly one response envelope.

use serde_json::{json, Value as J};

use crate::core::error::GatewayError;
use crate::core::mcp::{self, InitializeResult, RpcReq, RpcResp};
use crate::tools::registry::Registry;

#[derive(Clone)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub async fn handle_line(&self, line: &str) -> RpcResp {
        self.handle_bytes(line.as_bytes()).await
    }

    /// Decode one raw line as it came off the transport and answer it.
    pub async fn handle_bytes(&self, line: &[u8]) -> RpcResp {
        match mcp::decode_bytes(line) {
            Ok(req) => self.handle(req).await,
            Err(failure) => {
                tracing::warn!(id = %failure.id, error = %failure.error, "rejecting malformed request");
                failure.into_response()
            }
        }
    }

    pub async fn handle(&self, req: RpcReq) -> RpcResp {
        tracing::debug!(method = %req.method, id = %req.id, "dispatching request");
        match self.route(&req).await {
            Ok(result) => mcp::ok(req.id, result),
            Err(e) => {
                tracing::warn!(method = %req.method, id = %req.id, code = e.code(), error = %e, "request failed");
                mcp::from_error(req.id, &e)
            }
        }
    }

    async fn route(&self, req: &RpcReq) -> Result<J, GatewayError> {
        match req.method.as_str() {
            "initialize" => Ok(json!(InitializeResult::default())),
            "tools/list" => Ok(json!({ "tools": self.registry.list() })),
            "tools/call" => self.call_tool(&req.params).await,
            "ping" => Ok(json!({})),
            m if m.starts_with("notifications/") => Ok(json!({})),
            other => Err(GatewayError::UnknownMethod(other.to_string())),
        }
    }

    async fn call_tool(&self, params: &J) -> Result<J, GatewayError> {
        let name = params
            .get("name")
            .and_then(J::as_str)
            .ok_or_else(|| GatewayError::InvalidTool("params.name must be a string".into()))?;
        let tool = self.registry.get(name)?;
        let args = params
            .get("arguments")
            .filter(|v| !v.is_null())
            .or_else(|| params.get("parameters"))
            .unwrap_or(&J::Null);
        tool.call(args).await
    }
}
