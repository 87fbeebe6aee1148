//! Receipt field drafting and candidate validation.

mod draft;
pub mod rules;
mod validator;

pub use draft::PatternExtractor;
pub use validator::{apply_authoritative_values, coerce_candidate, CandidateValidator};
pub(crate) use validator::check_record;
