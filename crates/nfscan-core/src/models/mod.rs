//! Data models for the processing pipeline.

pub mod config;
pub mod fields;
pub mod handoff;
pub mod record;

pub use config::NfscanConfig;
pub use fields::{Field, FieldSet, PaymentCategory};
pub use handoff::StagePayload;
pub use record::{CandidateRecord, DraftValue, PatternDraft, RawDocument, ValidatedRecord};
