//! Validation and normalization of generated candidate records.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::Rejection;
use crate::models::fields::{Field, FieldSet, PaymentCategory};
use crate::models::record::{CandidateRecord, ValidatedRecord};

use super::rules::patterns::{
    LABELLED_CONSUMER_TAX_ID, LABELLED_INVOICE_NUMBER, LABELLED_INVOICE_SERIES,
    LABELLED_ISSUER_TAX_ID, LABELLED_TOTAL_VALUE,
};
use super::rules::{
    digits_only, is_invoice_number, is_invoice_series, is_issue_date, normalize_consumer_tax_id,
    normalize_issuer_tax_id, normalize_total_value, ungroup_amount,
};

/// Fields whose labelled-line value is trusted over the generator's.
const AUTHORITATIVE: [Field; 5] = [
    Field::IssuerTaxId,
    Field::ConsumerTaxId,
    Field::InvoiceNumber,
    Field::InvoiceSeries,
    Field::TotalValue,
];

/// Checks a candidate record against every field grammar.
///
/// A record either passes every step and comes out normalized, or is
/// rejected whole.
pub struct CandidateValidator {
    authoritative_override: bool,
}

impl CandidateValidator {
    pub fn new() -> Self {
        Self {
            authoritative_override: true,
        }
    }

    /// Enable or disable re-deriving identifier fields from labelled lines.
    pub fn with_authoritative_override(mut self, enabled: bool) -> Self {
        self.authoritative_override = enabled;
        self
    }

    /// Validate a decoded candidate object.
    ///
    /// `free_text` is scanned for labelled lines (`Invoice Number: 123456`)
    /// whose values override the candidate's identifier fields.
    pub fn validate(
        &self,
        candidate: &Map<String, Value>,
        free_text: &str,
    ) -> Result<ValidatedRecord, Rejection> {
        info!("Validating generated candidate");

        let mut record = coerce_candidate(candidate)?;
        if self.authoritative_override {
            apply_authoritative_values(&mut record, free_text);
        }

        let result = check_record(record);
        match &result {
            Ok(_) => info!("Candidate accepted"),
            Err(rejection) => debug!("Candidate rejected: {}", rejection),
        }
        result
    }
}

impl Default for CandidateValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerce every slot to text. Missing keys and structured values reject.
pub fn coerce_candidate(candidate: &Map<String, Value>) -> Result<CandidateRecord, Rejection> {
    FieldSet::try_from_fn(|field| {
        let value = candidate
            .get(field.key())
            .ok_or(Rejection::MissingField(field))?;
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::Array(_) => Err(Rejection::Uncoercible { field, kind: "array" }),
            Value::Object(_) => Err(Rejection::Uncoercible { field, kind: "object" }),
        }
    })
}

/// Overwrite identifier fields with values found on their labelled lines.
///
/// Every line is scanned; when a label appears on several lines the last
/// match wins. Only the text after the label is searched, and the total must
/// be a whole amount token. Tax ids are stored as bare digits and
/// re-punctuated later.
pub fn apply_authoritative_values(record: &mut CandidateRecord, free_text: &str) {
    for line in free_text.lines() {
        for field in AUTHORITATIVE {
            let Some((_, rest)) = line.split_once(field.label()) else {
                continue;
            };
            let Some(value) = labelled_value(field, rest) else {
                continue;
            };
            debug!("Labelled {} overrides candidate with {:?}", field, value);
            *record.get_mut(field) = Some(value);
        }
    }
}

fn labelled_value(field: Field, text: &str) -> Option<String> {
    match field {
        Field::IssuerTaxId => LABELLED_ISSUER_TAX_ID.find(text).map(|m| digits_only(m.as_str())),
        Field::ConsumerTaxId => LABELLED_CONSUMER_TAX_ID.find(text).map(|m| digits_only(m.as_str())),
        Field::InvoiceNumber => LABELLED_INVOICE_NUMBER.find(text).map(|m| m.as_str().to_string()),
        Field::InvoiceSeries => LABELLED_INVOICE_SERIES.find(text).map(|m| m.as_str().to_string()),
        _ => LABELLED_TOTAL_VALUE
            .captures(text)
            .map(|caps| ungroup_amount(&caps[1])),
    }
}

pub(crate) fn check_record(record: CandidateRecord) -> Result<ValidatedRecord, Rejection> {
    let payment_method = match record.payment_method {
        None => None,
        Some(v) => match PaymentCategory::from_canonical(&v) {
            Some(category) => Some(category),
            None => return Err(invalid(Field::PaymentMethod, v, "not a payment category")),
        },
    };

    let invoice_number = check(record.invoice_number, Field::InvoiceNumber, "expected 6 or 9 digits", |v| {
        is_invoice_number(&v).then_some(v)
    })?;

    let invoice_series = check(record.invoice_series, Field::InvoiceSeries, "expected 3 digits", |v| {
        is_invoice_series(&v).then_some(v)
    })?;

    let total_value = check(record.total_value, Field::TotalValue, "not an amount", |v| {
        normalize_total_value(&v)
    })?;

    let consumer_tax_id = check(record.consumer_tax_id, Field::ConsumerTaxId, "not a CPF or CNPJ", |v| {
        normalize_consumer_tax_id(&v)
    })?;

    let issuer_tax_id = check(record.issuer_tax_id, Field::IssuerTaxId, "not a CNPJ", |v| {
        normalize_issuer_tax_id(&v)
    })?;

    let issue_date = check(record.issue_date, Field::IssueDate, "expected DD/MM/YYYY", |v| {
        is_issue_date(&v).then_some(v)
    })?;

    Ok(ValidatedRecord {
        issuer_name: record.issuer_name,
        issuer_tax_id,
        issuer_address: record.issuer_address,
        consumer_tax_id,
        issue_date,
        invoice_number,
        invoice_series,
        total_value,
        payment_method,
    })
}

/// Absent passes through; a present value must normalize.
fn check(
    value: Option<String>,
    field: Field,
    reason: &'static str,
    normalize: impl FnOnce(String) -> Option<String>,
) -> Result<Option<String>, Rejection> {
    match value {
        None => Ok(None),
        Some(v) => normalize(v.clone())
            .map(Some)
            .ok_or_else(|| invalid(field, v, reason)),
    }
}

fn invalid(field: Field, value: String, reason: &'static str) -> Rejection {
    Rejection::Invalid {
        field,
        value,
        reason,
    }
}
