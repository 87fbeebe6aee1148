//! Generative candidate extraction and its retry protocol.

pub mod decode;
pub mod prompt;
mod retry;

#[cfg(feature = "native")]
mod chat;

pub use retry::{CancelToken, GenerationOutcome, RetryPolicy, RetryingGenerator};

#[cfg(feature = "native")]
pub use chat::ChatGenerator;

use std::sync::Arc;

use crate::error::GeneratorError;

/// A source of raw candidate text for a document.
///
/// Output is free-form text expected to contain one JSON object with the
/// nine field keys. Implementations make one independent call per
/// invocation.
pub trait CandidateGenerator: Send + Sync {
    fn generate(&self, text: &str) -> Result<String, GeneratorError>;
}

impl<T: CandidateGenerator + ?Sized> CandidateGenerator for &T {
    fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        (**self).generate(text)
    }
}

impl<T: CandidateGenerator + ?Sized> CandidateGenerator for Box<T> {
    fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        (**self).generate(text)
    }
}

impl<T: CandidateGenerator + ?Sized> CandidateGenerator for Arc<T> {
    fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        (**self).generate(text)
    }
}
