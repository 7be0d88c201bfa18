//! Content items carried in a `tools/call` result.

use serde::Serialize;

/// A single `{"type":"text","text":...}` item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { kind: "text", text: text.into() }
    }

    /// Pretty-printed JSON as a text item; `null` when the value is absent.
    pub fn json(value: Option<&serde_json::Value>) -> Self {
        let text = value
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_else(|| "null".to_string());
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_as_typed_text() {
        let v = serde_json::to_value(TextContent::new("ok")).unwrap();
        assert_eq!(v, json!({"type":"text","text":"ok"}));
    }

    #[test]
    fn absent_json_renders_null() {
        assert_eq!(TextContent::json(None).text, "null");
        let t = TextContent::json(Some(&json!({"a":1})));
        assert!(t.text.contains("\"a\": 1"));
    }
}
