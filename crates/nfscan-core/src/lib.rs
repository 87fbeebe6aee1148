//! Core library for invoice receipt processing.
//!
//! This crate provides:
//! - Text extraction boundary (OCR engine, plain-text sidecars)
//! - Pattern-based field extraction into a deterministic draft
//! - Validation and normalization of generated candidate records
//! - Bounded retry protocol around an external generative extractor
//! - Routing of source files by payment category
//! - The inter-stage handoff payload and an in-process pipeline

pub mod error;
pub mod generation;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod routing;
pub mod storage;

pub use error::{NfscanError, Result};
pub use generation::{CancelToken, CandidateGenerator, GenerationOutcome, RetryPolicy, RetryingGenerator};
pub use invoice::{CandidateValidator, PatternExtractor};
pub use models::fields::{Field, FieldSet, PaymentCategory};
pub use models::handoff::StagePayload;
pub use models::record::{CandidateRecord, DraftValue, PatternDraft, RawDocument, ValidatedRecord};
pub use ocr::{SidecarTextExtractor, TextExtractor};
#[cfg(feature = "native")]
pub use ocr::{OcrTextExtractor, PureOcrEngine};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use routing::{Destination, Router};
pub use storage::{LocalStore, ObjectStore};

#[cfg(feature = "native")]
pub use generation::ChatGenerator;
