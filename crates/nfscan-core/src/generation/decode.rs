//! Best-effort decoding of raw generator output into a JSON object.
//!
//! Models routinely wrap the object in a markdown fence, drop one of the
//! outer braces, or emit a stray brace inside the body. Decoding strips the
//! fence, removes every brace and re-wraps the remainder, so a flat object
//! with string or null values survives all three.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Strip a markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    trimmed
}

/// Rewrite raw output as `{` + body without braces + `\n}`.
pub fn sanitize(raw: &str) -> String {
    let body: String = strip_code_fence(raw)
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect();
    format!("{{{}\n}}", body)
}

/// Decode raw generator output into a JSON object.
pub fn decode_candidate(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    let sanitized = sanitize(raw);
    Ok(serde_json::from_str(&sanitized)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sanitize_rewraps() {
        assert_eq!(sanitize(r#"{"a": "1"}"#), "{\"a\": \"1\"\n}");
        assert_eq!(sanitize(r#""a": "1""#), "{\"a\": \"1\"\n}");
    }

    #[test]
    fn test_decode_plain_object() {
        let map = decode_candidate(r#"{"invoice_number": "123456", "total_value": null}"#).unwrap();
        assert_eq!(map.get("invoice_number"), Some(&json!("123456")));
        assert_eq!(map.get("total_value"), Some(&Value::Null));
    }

    #[test]
    fn test_decode_missing_braces() {
        let map = decode_candidate("\n\"invoice_series\": \"001\",\n\"issue_date\": null").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("invoice_series"), Some(&json!("001")));
    }

    #[test]
    fn test_decode_unbalanced_braces() {
        let map = decode_candidate("{{\"a\": \"x\"}").unwrap();
        assert_eq!(map.get("a"), Some(&json!("x")));
    }

    #[test]
    fn test_decode_fenced_output() {
        let raw = "Here is the record:\n```json\n{\"a\": \"x\", \"b\": null}\n```\nDone.";
        let map = decode_candidate(raw).unwrap();
        assert_eq!(map.len(), 2);

        let raw = "```\n{\"a\": \"x\"}\n```";
        assert_eq!(decode_candidate(raw).unwrap().get("a"), Some(&json!("x")));
    }

    #[test]
    fn test_decode_rejects_prose() {
        assert!(decode_candidate("I could not find any invoice data.").is_err());
        assert!(decode_candidate("Result: {\"a\": \"x\"}").is_err());
    }

    #[test]
    fn test_decode_empty_output_is_empty_object() {
        assert!(decode_candidate("").unwrap().is_empty());
    }
}
