//! Rule-based field extractors and grammars for receipt fields.

pub mod amounts;
pub mod dates;
pub mod numbers;
pub mod patterns;
pub mod payment;
pub mod tax_id;

pub use amounts::{normalize_total_value, ungroup_amount};
pub use dates::is_issue_date;
pub use numbers::{is_invoice_number, is_invoice_series};
pub use payment::{canonical_payment, PaymentExtractor};
pub use tax_id::{digits_only, format_tax_id, normalize_consumer_tax_id, normalize_issuer_tax_id};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A single-pattern extractor. Takes capture group 1 when the pattern has
/// one, the whole match otherwise.
pub struct PatternRule {
    pattern: &'static Regex,
}

impl PatternRule {
    pub fn new(pattern: &'static Regex) -> Self {
        Self { pattern }
    }
}

impl FieldExtractor for PatternRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.pattern.captures(text)?;
        let m = caps.get(1).or_else(|| caps.get(0))?;
        let value = m.as_str().trim();
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }
}
