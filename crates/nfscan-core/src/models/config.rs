//! Configuration structures for the processing pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::generation::RetryPolicy;
use crate::invoice::CandidateValidator;

/// Main configuration for the nfscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NfscanConfig {
    /// Candidate generation configuration.
    pub generation: GenerationConfig,

    /// Generate-and-validate retry configuration.
    pub retry: RetryConfig,

    /// Candidate validation configuration.
    pub validation: ValidationConfig,

    /// Routing configuration.
    pub routing: RoutingConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Object storage configuration.
    pub storage: StorageConfig,
}

/// Chat-completions endpoint used for candidate generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// OpenAI-compatible chat completions URL.
    pub endpoint: String,

    /// Model name.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Maximum tokens in the answer.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            max_tokens: 512,
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// Bounds on the generate-and-validate loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum generation attempts per document (at least one is always made).
    pub max_attempts: u32,

    /// Overall deadline for the loop in seconds (none = unbounded).
    pub timeout_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            timeout_secs: None,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Candidate validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Re-derive identifier fields and the total from labelled draft lines.
    pub authoritative_override: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            authoritative_override: true,
        }
    }
}

impl ValidationConfig {
    pub fn validator(&self) -> CandidateValidator {
        CandidateValidator::new().with_authoritative_override(self.authoritative_override)
    }
}

/// Destination categories under each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Category for cash and PIX payments.
    pub cash_category: String,

    /// Category for every other payment method.
    pub other_category: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cash_category: "cash".to_string(),
            other_category: "other".to_string(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers in recognized text instead of blanking them.
    pub keep_unk: bool,

    /// Vertical band in pixels within which regions share a text line.
    pub row_height: f32,

    /// Recognition confidence threshold (0.0 - 1.0). Regions below it are dropped.
    pub recognition_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            row_height: 20.0,
            recognition_threshold: 0.0, // CTC confidence scores run low
        }
    }
}

impl OcrConfig {
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }
}

/// Local object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory whose subdirectories are buckets.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl NfscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: NfscanConfig =
            serde_json::from_str(r#"{"retry":{"max_attempts":3},"routing":{"cash_category":"dinheiro"}}"#)
                .unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.timeout_secs, None);
        assert_eq!(config.routing.cash_category, "dinheiro");
        assert_eq!(config.routing.other_category, "other");
        assert_eq!(config.generation.api_key_env, "GROQ_API_KEY");
        assert!(config.validation.authoritative_override);
        assert_eq!(config.ocr.recognition_threshold, 0.0);
    }

    #[test]
    fn test_retry_policy_conversion() {
        let retry = RetryConfig {
            max_attempts: 4,
            timeout_secs: Some(30),
        };
        let policy = retry.policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = NfscanConfig::default();
        config.ocr.keep_unk = true;
        config.save(&path).unwrap();

        let loaded = NfscanConfig::from_file(&path).unwrap();
        assert!(loaded.ocr.keep_unk);
        assert_eq!(loaded.ocr.detection_path(), PathBuf::from("models/det.onnx"));
    }
}
