use serde_json::Value as J;

use crate::domain::{GroundingInfo, SearchResult};

/// Rendered search widget HTML; large and useless to tool hosts.
pub const NOISY_FIELD: &str = "searchEntryPoint";

/// Returns a copy of `raw` with every `searchEntryPoint` key removed from
/// `metadata` and `fullResponse`. `raw` itself is left untouched.
pub fn sanitize(raw: &SearchResult) -> SearchResult {
    SearchResult {
        answer: raw.answer.clone(),
        metadata: raw.metadata.as_ref().map(strip),
        full_response: raw.full_response.as_ref().map(strip),
    }
}

fn strip(value: &J) -> J {
    let mut copy = value.clone();
    strip_in_place(&mut copy);
    copy
}

fn strip_in_place(value: &mut J) {
    match value {
        J::Object(map) => {
            map.remove(NOISY_FIELD);
            map.values_mut().for_each(strip_in_place);
        }
        J::Array(items) => items.iter_mut().for_each(strip_in_place),
        _ => {}
    }
}

/// Project the grounding fields hosts care about, defaulting to empty arrays.
pub fn grounding_info(metadata: Option<&J>) -> GroundingInfo {
    let list = |key: &str| -> Vec<J> {
        metadata
            .and_then(|m| m.get(key))
            .and_then(J::as_array)
            .cloned()
            .unwrap_or_default()
    };
    GroundingInfo {
        web_search_queries: list("webSearchQueries"),
        grounding_chunks: list("groundingChunks"),
        grounding_supports: list("groundingSupports"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw() -> SearchResult {
        SearchResult {
            answer: "42".into(),
            metadata: Some(json!({
                "searchEntryPoint": {"renderedContent": "<div/>"},
                "webSearchQueries": ["a"]
            })),
            full_response: Some(json!({
                "candidates": [
                    {"groundingMetadata": {"searchEntryPoint": {}, "groundingChunks": [{"web": {"uri": "u"}}]}},
                    {"content": {"parts": [{"text": "x"}]}}
                ],
                "usageMetadata": {"totalTokenCount": 3}
            })),
        }
    }

    #[test]
    fn strips_top_level_metadata_field() {
        let out = sanitize(&raw());
        assert_eq!(out.metadata, Some(json!({"webSearchQueries": ["a"]})));
    }

    #[test]
    fn strips_candidate_grounding_metadata_field() {
        let out = sanitize(&raw());
        let full = out.full_response.unwrap();
        let gm = &full["candidates"][0]["groundingMetadata"];
        assert!(gm.get(NOISY_FIELD).is_none());
        assert_eq!(gm["groundingChunks"][0]["web"]["uri"], "u");
        assert_eq!(full["usageMetadata"]["totalTokenCount"], 3);
    }

    #[test]
    fn does_not_mutate_the_input() {
        let input = raw();
        let _ = sanitize(&input);
        assert!(input.metadata.as_ref().unwrap().get(NOISY_FIELD).is_some());
        assert_eq!(input, raw());
    }

    #[test]
    fn absent_fields_are_nothing_to_sanitize() {
        let out = sanitize(&SearchResult { answer: "a".into(), ..Default::default() });
        assert!(out.metadata.is_none());
        assert!(out.full_response.is_none());

        let out = sanitize(&SearchResult {
            full_response: Some(json!({"usageMetadata": {}})),
            ..Default::default()
        });
        assert_eq!(out.full_response, Some(json!({"usageMetadata": {}})));
    }

    #[test]
    fn grounding_info_defaults_missing_fields() {
        let info = grounding_info(Some(&json!({"webSearchQueries": ["a", "b"]})));
        assert_eq!(info.web_search_queries, vec![json!("a"), json!("b")]);
        assert!(info.grounding_chunks.is_empty());
        assert!(info.grounding_supports.is_empty());
        assert_eq!(grounding_info(None), GroundingInfo::default());
    }
}
