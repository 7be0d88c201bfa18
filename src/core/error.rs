use thiserror::Error;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// Gateway-wide error model. Every variant maps onto one fixed JSON-RPC code.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Method not found: {0}")]
    UnknownMethod(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid tool reference: {0}")]
    InvalidTool(String),
    #[error("{0}")]
    InvalidParams(String),
    /// Backend message passed through verbatim.
    #[error("{0}")]
    SearchFailure(String),
}

impl GatewayError {
    pub fn code(&self) -> i32 {
        match self {
            GatewayError::Parse(_) => PARSE_ERROR,
            GatewayError::UnknownMethod(_) | GatewayError::UnknownTool(_) => METHOD_NOT_FOUND,
            GatewayError::InvalidTool(_) => INVALID_REQUEST,
            GatewayError::InvalidParams(_) => INVALID_PARAMS,
            GatewayError::SearchFailure(_) => INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_each_variant_to_a_fixed_code() {
        assert_eq!(GatewayError::Parse("x".into()).code(), -32700);
        assert_eq!(GatewayError::UnknownMethod("x".into()).code(), -32601);
        assert_eq!(GatewayError::UnknownTool("translate".into()).code(), -32601);
        assert_eq!(GatewayError::InvalidTool("x".into()).code(), -32600);
        assert_eq!(GatewayError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(GatewayError::SearchFailure("x".into()).code(), -32603);
    }

    #[test]
    fn search_failure_displays_backend_message_verbatim() {
        let e = GatewayError::SearchFailure("quota exceeded".into());
        assert_eq!(e.to_string(), "quota exceeded");
    }
}
