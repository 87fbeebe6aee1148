//! Documents, drafts and records flowing through the pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::invoice::check_record;

use super::fields::{Field, FieldSet, PaymentCategory};

/// Sentinel rendered for draft fields whose pattern did not match.
pub const NOT_FOUND: &str = "<none>";

/// An extracted document. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    file_name: String,
    bucket_name: String,
    lines: Vec<String>,
}

impl RawDocument {
    pub fn new(
        file_name: impl Into<String>,
        bucket_name: impl Into<String>,
        lines: Vec<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bucket_name: bucket_name.into(),
            lines,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True when no line carries any visible text.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// A generated candidate after type coercion: every slot is text or absent.
pub type CandidateRecord = FieldSet<Option<String>>;

/// Value of one draft slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DraftValue {
    /// The field pattern matched.
    Found(String),
    /// The field pattern did not match. Distinct from null.
    #[default]
    NotFound,
}

impl fmt::Display for DraftValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftValue::Found(v) => f.write_str(v),
            DraftValue::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

/// Deterministic, rule-based draft of a document's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternDraft {
    pub fields: FieldSet<DraftValue>,
}

impl PatternDraft {
    pub fn get(&self, field: Field) -> &DraftValue {
        self.fields.get(field)
    }

    /// Render as `Label: value` lines in field order.
    ///
    /// This is the text handed to the generator, and the text the validator
    /// re-scans for authoritative values.
    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|(field, value)| format!("{}: {}", field.label(), value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A record whose every present field satisfies its grammar.
///
/// Deserialization re-runs the field checks, so a record read from a
/// handoff payload is as trustworthy as one produced by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRecord")]
pub struct ValidatedRecord {
    pub issuer_name: Option<String>,
    pub issuer_tax_id: Option<String>,
    pub issuer_address: Option<String>,
    pub consumer_tax_id: Option<String>,
    pub issue_date: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_series: Option<String>,
    pub total_value: Option<String>,
    pub payment_method: Option<PaymentCategory>,
}

impl ValidatedRecord {
    /// Re-run every field check. A conformant record comes back unchanged.
    pub fn revalidate(&self) -> Result<ValidatedRecord, Rejection> {
        check_record(FieldSet {
            issuer_name: self.issuer_name.clone(),
            issuer_tax_id: self.issuer_tax_id.clone(),
            issuer_address: self.issuer_address.clone(),
            consumer_tax_id: self.consumer_tax_id.clone(),
            issue_date: self.issue_date.clone(),
            invoice_number: self.invoice_number.clone(),
            invoice_series: self.invoice_series.clone(),
            total_value: self.total_value.clone(),
            payment_method: self.payment_method.map(|p| p.as_str().to_string()),
        })
    }

    /// Total value as a decimal amount.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.total_value
            .as_deref()
            .and_then(|v| Decimal::from_str(v).ok())
    }

    /// Issue date as a calendar date. `None` when absent or not a real date
    /// (the grammar only constrains the shape).
    pub fn issue_date_parsed(&self) -> Option<NaiveDate> {
        self.issue_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%d/%m/%Y").ok())
    }

    /// Count of fields that are present.
    pub fn present_fields(&self) -> usize {
        [
            self.issuer_name.is_some(),
            self.issuer_tax_id.is_some(),
            self.issuer_address.is_some(),
            self.consumer_tax_id.is_some(),
            self.issue_date.is_some(),
            self.invoice_number.is_some(),
            self.invoice_series.is_some(),
            self.total_value.is_some(),
            self.payment_method.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Wire shape of a record before its fields are checked.
#[derive(Deserialize, Default)]
#[serde(default)]
struct UncheckedRecord {
    issuer_name: Option<String>,
    issuer_tax_id: Option<String>,
    issuer_address: Option<String>,
    consumer_tax_id: Option<String>,
    issue_date: Option<String>,
    invoice_number: Option<String>,
    invoice_series: Option<String>,
    total_value: Option<String>,
    payment_method: Option<String>,
}

impl TryFrom<UncheckedRecord> for ValidatedRecord {
    type Error = Rejection;

    fn try_from(raw: UncheckedRecord) -> Result<Self, Self::Error> {
        check_record(FieldSet {
            issuer_name: raw.issuer_name,
            issuer_tax_id: raw.issuer_tax_id,
            issuer_address: raw.issuer_address,
            consumer_tax_id: raw.consumer_tax_id,
            issue_date: raw.issue_date,
            invoice_number: raw.invoice_number,
            invoice_series: raw.invoice_series,
            total_value: raw.total_value,
            payment_method: raw.payment_method,
        })
    }
}
