//! The payload passed between pipeline stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HandoffError;

use super::record::ValidatedRecord;

pub const FILE_NAME: &str = "file_name";
pub const BUCKET_NAME: &str = "bucket_name";
pub const IMPORTANT_DATA: &str = "important_data";
pub const RESULT_JSON: &str = "result_json";

/// Inter-stage handoff payload.
///
/// `file_name` and `bucket_name` are always required and carried unchanged
/// from the first stage to the last. The stage keys are filled in as the
/// document moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePayload {
    pub file_name: String,
    pub bucket_name: String,

    /// Extracted lines, or the rendered draft, newline-joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important_data: Option<String>,

    /// The validated record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_json: Option<ValidatedRecord>,

    /// Where the routing stage placed the source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_key: Option<String>,
}

impl StagePayload {
    pub fn new(file_name: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bucket_name: bucket_name.into(),
            important_data: None,
            result_json: None,
            destination_key: None,
        }
    }

    /// Parse a payload, failing fast on missing identity keys.
    pub fn from_value(value: Value) -> Result<Self, HandoffError> {
        let object = value.as_object().ok_or(HandoffError::NotAnObject)?;
        for key in [FILE_NAME, BUCKET_NAME] {
            if object.get(key).is_none_or(Value::is_null) {
                return Err(HandoffError::MissingKey(key));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a payload from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HandoffError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// The `important_data` key, required by the pattern and generation stages.
    pub fn require_important_data(&self) -> Result<&str, HandoffError> {
        self.important_data
            .as_deref()
            .ok_or(HandoffError::MissingKey(IMPORTANT_DATA))
    }

    /// The `result_json` key, required by the routing stage.
    pub fn require_result(&self) -> Result<&ValidatedRecord, HandoffError> {
        self.result_json
            .as_ref()
            .ok_or(HandoffError::MissingKey(RESULT_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_identity_keys_fail_fast() {
        let err = StagePayload::from_value(json!({ "bucket_name": "b" })).unwrap_err();
        assert!(matches!(err, HandoffError::MissingKey("file_name")));

        let err = StagePayload::from_value(json!({ "file_name": "a.png", "bucket_name": null }))
            .unwrap_err();
        assert!(matches!(err, HandoffError::MissingKey("bucket_name")));

        let err = StagePayload::from_value(json!(["a.png"])).unwrap_err();
        assert!(matches!(err, HandoffError::NotAnObject));
    }

    #[test]
    fn test_wrong_types_are_invalid() {
        let err = StagePayload::from_value(json!({ "file_name": 3, "bucket_name": "b" }))
            .unwrap_err();
        assert!(matches!(err, HandoffError::Invalid(_)));

        let err = StagePayload::from_value(json!({
            "file_name": "a.png",
            "bucket_name": "b",
            "result_json": { "payment_method": "dinheiropix" }
        }))
        .unwrap_err();
        assert!(matches!(err, HandoffError::Invalid(_)));

        let err = StagePayload::from_value(json!({
            "file_name": "a.png",
            "bucket_name": "b",
            "result_json": { "invoice_number": "12", "total_value": "abc", "payment_method": "other" }
        }))
        .unwrap_err();
        assert!(matches!(err, HandoffError::Invalid(_)));
    }

    #[test]
    fn test_stage_keys_are_optional_until_required() {
        let payload =
            StagePayload::from_json(r#"{"file_name":"a.png","bucket_name":"b","statusCode":200}"#)
                .unwrap();
        assert_eq!(payload, StagePayload::new("a.png", "b"));
        assert!(matches!(
            payload.require_important_data(),
            Err(HandoffError::MissingKey("important_data"))
        ));
        assert!(matches!(
            payload.require_result(),
            Err(HandoffError::MissingKey("result_json"))
        ));
    }

    #[test]
    fn test_absent_stage_keys_are_not_serialized() {
        let json = serde_json::to_value(StagePayload::new("a.png", "b")).unwrap();
        assert_eq!(json, json!({ "file_name": "a.png", "bucket_name": "b" }));
    }
}
