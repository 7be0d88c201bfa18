//! JSON-RPC envelope codec shared by the stdio and HTTP surfaces.
//!
//! Inbound lines decode into [`RpcReq`]; every outcome, success or failure,
//! encodes into exactly one newline-terminated [`RpcResp`] line.

use serde::{Deserialize, Serialize};
use serde_json::Value as J;

use crate::core::error::{GatewayError, INTERNAL_ERROR};

pub const JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Deserialize, Debug, Clone)]
pub struct RpcReq {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: J,
    pub method: String,
    #[serde(default)]
    pub params: J,
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResp {
    pub jsonrpc: String,
    pub id: J,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp { jsonrpc: JSONRPC_VERSION.into(), id, result: Some(result), error: None }
}

pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp {
        jsonrpc: JSONRPC_VERSION.into(),
        id,
        result: None,
        error: Some(RpcErr { code, message: msg.into(), data }),
    }
}

pub fn from_error(id: J, e: &GatewayError) -> RpcResp {
    err(id, e.code(), e.to_string(), None)
}

/// A line that could not be turned into a request. `id` is whatever could be
/// salvaged from a partial parse, otherwise `null`.
#[derive(Debug)]
pub struct DecodeFailure {
    pub id: J,
    pub error: GatewayError,
}

impl DecodeFailure {
    pub fn into_response(self) -> RpcResp {
        from_error(self.id, &self.error)
    }
}

/// Ids are opaque but limited to string, number or null.
fn sanitize_id(id: Option<&J>) -> J {
    match id {
        Some(v @ (J::String(_) | J::Number(_))) => v.clone(),
        _ => J::Null,
    }
}

pub fn decode(line: &str) -> Result<RpcReq, DecodeFailure> {
    let raw: J = serde_json::from_str(line).map_err(|e| DecodeFailure {
        id: J::Null,
        error: GatewayError::Parse(e.to_string()),
    })?;
    let J::Object(_) = &raw else {
        return Err(DecodeFailure {
            id: J::Null,
            error: GatewayError::Parse("request must be a JSON object".into()),
        });
    };
    let id = sanitize_id(raw.get("id"));
    let mut req: RpcReq = serde_json::from_value(raw).map_err(|e| DecodeFailure {
        id: id.clone(),
        error: GatewayError::Parse(e.to_string()),
    })?;
    req.id = id;
    Ok(req)
}

/// Raw transport bytes. Anything that is not UTF-8 is malformed, not repaired.
pub fn decode_bytes(bytes: &[u8]) -> Result<RpcReq, DecodeFailure> {
    let line = std::str::from_utf8(bytes).map_err(|e| DecodeFailure {
        id: J::Null,
        error: GatewayError::Parse(format!("invalid UTF-8: {e}")),
    })?;
    decode(line)
}

/// Serialize one envelope as a single newline-terminated line.
pub fn encode(resp: &RpcResp) -> String {
    match &resp.error {
        Some(e) => encode_error(resp.id.clone(), e.code, e.message.clone()),
        None => encode_result(resp.id.clone(), resp.result.clone().unwrap_or(J::Null)),
    }
}

pub fn encode_result(id: J, result: J) -> String {
    to_line(&ok(id, result))
}

pub fn encode_error(id: J, code: i32, message: impl Into<String>) -> String {
    to_line(&err(id, code, message, None))
}

fn to_line(resp: &RpcResp) -> String {
    match serde_json::to_string(resp) {
        Ok(mut s) => {
            s.push('\n');
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response envelope");
            let fallback = err(resp.id.clone(), INTERNAL_ERROR, "failed to serialize response", None);
            let mut s = serde_json::to_string(&fallback).unwrap_or_else(|_| {
                r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"failed to serialize response"}}"#
                    .to_string()
            });
            s.push('\n');
            s
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: J,
    pub server_info: ServerInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: serde_json::json!({ "tools": {} }),
            server_info: ServerInfo::default(),
        }
    }
}
