//! Error types for the nfscan-core library.

use thiserror::Error;

use crate::models::fields::Field;

/// Main error type for the nfscan library.
///
/// Every variant is terminal for the document being processed. Malformed or
/// invalid generator output never reaches this type; it is absorbed by the
/// retry loop and only shows up inside [`GenerationError::Exhausted`].
#[derive(Error, Debug)]
pub enum NfscanError {
    /// Text extraction failed.
    #[error("text extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Candidate generation did not produce a valid record.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Object storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Inter-stage payload contract violation.
    #[error("handoff error: {0}")]
    Handoff(#[from] HandoffError),

    /// Extraction succeeded but produced no text.
    #[error("no text extracted from {file_name}")]
    NoText { file_name: String },

    /// The copy to the destination succeeded but the source could not be
    /// deleted. Both objects exist.
    #[error("relocation of {bucket}/{source_key} to {destination_key} left the source in place: {source}")]
    PartialRelocation {
        bucket: String,
        source_key: String,
        destination_key: String,
        #[source]
        source: StorageError,
    },
}

/// Errors raised by text extraction collaborators.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or content.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The source object could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from the best-effort decode of raw generator output.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The sanitized text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a candidate record is rejected by the validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A required field key is missing from the candidate.
    #[error("missing field {0}")]
    MissingField(Field),

    /// A field holds a value that cannot be coerced to text.
    #[error("field {field} holds an uncoercible {kind}")]
    Uncoercible { field: Field, kind: &'static str },

    /// A field value violates its grammar.
    #[error("field {field} rejected ({reason}): {value:?}")]
    Invalid {
        field: Field,
        value: String,
        reason: &'static str,
    },
}

/// Errors raised by a candidate generator collaborator.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The generation API answered with an error status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answer could not be read.
    #[error("failed to read response: {0}")]
    Response(String),

    /// No API key is configured.
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
}

/// Why a single generation attempt failed.
#[derive(Error, Debug)]
pub enum AttemptFailure {
    /// The generator call itself failed.
    #[error("generator call failed: {0}")]
    Generator(#[from] GeneratorError),

    /// The output could not be decoded into an object.
    #[error("undecodable output: {0}")]
    Decode(#[from] DecodeError),

    /// The decoded record failed validation.
    #[error("record rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Terminal outcomes of the generate-and-validate loop.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Every allowed attempt failed.
    #[error("no valid record after {attempts} attempts, last failure: {last_failure}")]
    Exhausted {
        attempts: u32,
        last_failure: AttemptFailure,
    },

    /// The caller cancelled the loop.
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    /// The loop ran past its deadline.
    #[error("timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },
}

/// Errors related to object storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The key or bucket name would escape the storage root.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inter-stage payload contract violations.
#[derive(Error, Debug)]
pub enum HandoffError {
    /// The payload is not a JSON object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// A required key is absent or null.
    #[error("missing required key: {0}")]
    MissingKey(&'static str),

    /// A key is present but has the wrong shape.
    #[error("invalid payload: {0}")]
    Invalid(#[from] serde_json::Error),

    /// `result_json` holds a value that fails its field grammar.
    #[error("invalid result_json: {0}")]
    InvalidRecord(#[from] Rejection),
}

/// Result type for the nfscan library.
pub type Result<T> = std::result::Result<T, NfscanError>;
