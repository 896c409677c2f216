//! Resilient JSON decoding for model output
//!
//! Completions are occasionally wrapped in prose or truncated at a token
//! limit. Decoding runs staged heuristics, first success wins: direct
//! parse, greedy brace-span extraction, bracket-count truncation repair.
//! No general JSON-repair grammar is attempted beyond these stages.

use crate::error::{AppError, Result};
use serde_json::Value;
use tracing::warn;

/// Decode raw model text into a JSON value.
pub fn decode(raw: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }
    warn!("direct JSON parse failed, trying brace extraction");

    if let Some(span) = brace_span(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
        warn!("extracted JSON span failed to parse, trying truncation repair");
    }

    let repaired = repair_truncated(raw);
    serde_json::from_str::<Value>(&repaired)
        .map_err(|e| AppError::MalformedPayload(e.to_string()))
}

/// Substring from the first `{` through the last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Close a payload cut off mid-structure: drop a dangling trailing comma,
/// then append the missing `]`s before the missing `}`s.
fn repair_truncated(text: &str) -> String {
    let mut fixed = text.trim_end().to_string();
    if fixed.ends_with(',') {
        fixed.pop();
    }

    let missing_brackets = fixed
        .matches('[')
        .count()
        .saturating_sub(fixed.matches(']').count());
    let missing_braces = fixed
        .matches('{')
        .count()
        .saturating_sub(fixed.matches('}').count());

    for _ in 0..missing_brackets {
        fixed.push(']');
    }
    for _ in 0..missing_braces {
        fixed.push('}');
    }

    fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_parse() {
        assert_eq!(decode(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_prose_wrapped_object() {
        let raw = r#"好的，以下是结果 {"a":1} 希望对你有帮助"#;
        assert_eq!(decode(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_truncated_array_repair() {
        assert_eq!(decode(r#"{"a":[1,2,"#).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_truncated_with_trailing_whitespace() {
        assert_eq!(
            decode("{\"a\":[{\"b\":1},{\"c\":2},  \n").unwrap(),
            json!({"a": [{"b": 1}, {"c": 2}]})
        );
    }

    #[test]
    fn test_truncation_inside_an_entry_is_unrecoverable() {
        // bracket-then-brace closing cannot rescue a cut mid-object
        let err = decode(r#"{"chartPoints":[{"age":1,"open":45"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedPayload(_)));
    }

    #[test]
    fn test_brace_span_extraction() {
        assert_eq!(brace_span("abc {\"a\":1} def"), Some("{\"a\":1}"));
        assert_eq!(brace_span("no braces"), None);
        assert_eq!(brace_span("} reversed {"), None);
    }

    #[test]
    fn test_repair_appends_brackets_before_braces() {
        assert_eq!(repair_truncated("{\"a\":[1,"), "{\"a\":[1]}");
        assert_eq!(repair_truncated("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_unsalvageable_input() {
        let err = decode("not json at all").unwrap_err();
        assert!(matches!(err, AppError::MalformedPayload(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            decode("").unwrap_err(),
            AppError::MalformedPayload(_)
        ));
    }
}
