//! The fixed field set carried by every invoice record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the nine semantic fields of an invoice record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Issuer legal name (free text).
    IssuerName,
    /// Issuer CNPJ, `DD.DDD.DDD/DDDD-DD`.
    IssuerTaxId,
    /// Issuer address (free text).
    IssuerAddress,
    /// Consumer CPF `DDD.DDD.DDD-DD` or CNPJ.
    ConsumerTaxId,
    /// Issue date, `DD/MM/YYYY`.
    IssueDate,
    /// Invoice number, 6 or 9 digits.
    InvoiceNumber,
    /// Invoice series, 3 digits.
    InvoiceSeries,
    /// Total value with a two-digit fraction.
    TotalValue,
    /// Canonical payment category.
    PaymentMethod,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 9] = [
        Field::IssuerName,
        Field::IssuerTaxId,
        Field::IssuerAddress,
        Field::ConsumerTaxId,
        Field::IssueDate,
        Field::InvoiceNumber,
        Field::InvoiceSeries,
        Field::TotalValue,
        Field::PaymentMethod,
    ];

    /// JSON key used in candidate and validated records.
    pub fn key(self) -> &'static str {
        match self {
            Field::IssuerName => "issuer_name",
            Field::IssuerTaxId => "issuer_tax_id",
            Field::IssuerAddress => "issuer_address",
            Field::ConsumerTaxId => "consumer_tax_id",
            Field::IssueDate => "issue_date",
            Field::InvoiceNumber => "invoice_number",
            Field::InvoiceSeries => "invoice_series",
            Field::TotalValue => "total_value",
            Field::PaymentMethod => "payment_method",
        }
    }

    /// Label used when a draft is rendered as `Label: value` lines.
    pub fn label(self) -> &'static str {
        match self {
            Field::IssuerName => "Issuer Name",
            Field::IssuerTaxId => "Issuer Tax ID",
            Field::IssuerAddress => "Issuer Address",
            Field::ConsumerTaxId => "Consumer Tax ID",
            Field::IssueDate => "Issue Date",
            Field::InvoiceNumber => "Invoice Number",
            Field::InvoiceSeries => "Invoice Series",
            Field::TotalValue => "Total Value",
            Field::PaymentMethod => "Payment Method",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A fixed-shape record with one slot per [`Field`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet<T> {
    pub issuer_name: T,
    pub issuer_tax_id: T,
    pub issuer_address: T,
    pub consumer_tax_id: T,
    pub issue_date: T,
    pub invoice_number: T,
    pub invoice_series: T,
    pub total_value: T,
    pub payment_method: T,
}

impl<T> FieldSet<T> {
    /// Build a field set by computing every slot.
    pub fn from_fn(mut f: impl FnMut(Field) -> T) -> Self {
        Self {
            issuer_name: f(Field::IssuerName),
            issuer_tax_id: f(Field::IssuerTaxId),
            issuer_address: f(Field::IssuerAddress),
            consumer_tax_id: f(Field::ConsumerTaxId),
            issue_date: f(Field::IssueDate),
            invoice_number: f(Field::InvoiceNumber),
            invoice_series: f(Field::InvoiceSeries),
            total_value: f(Field::TotalValue),
            payment_method: f(Field::PaymentMethod),
        }
    }

    /// Build a field set, stopping at the first slot that fails.
    pub fn try_from_fn<E>(mut f: impl FnMut(Field) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            issuer_name: f(Field::IssuerName)?,
            issuer_tax_id: f(Field::IssuerTaxId)?,
            issuer_address: f(Field::IssuerAddress)?,
            consumer_tax_id: f(Field::ConsumerTaxId)?,
            issue_date: f(Field::IssueDate)?,
            invoice_number: f(Field::InvoiceNumber)?,
            invoice_series: f(Field::InvoiceSeries)?,
            total_value: f(Field::TotalValue)?,
            payment_method: f(Field::PaymentMethod)?,
        })
    }

    pub fn get(&self, field: Field) -> &T {
        match field {
            Field::IssuerName => &self.issuer_name,
            Field::IssuerTaxId => &self.issuer_tax_id,
            Field::IssuerAddress => &self.issuer_address,
            Field::ConsumerTaxId => &self.consumer_tax_id,
            Field::IssueDate => &self.issue_date,
            Field::InvoiceNumber => &self.invoice_number,
            Field::InvoiceSeries => &self.invoice_series,
            Field::TotalValue => &self.total_value,
            Field::PaymentMethod => &self.payment_method,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut T {
        match field {
            Field::IssuerName => &mut self.issuer_name,
            Field::IssuerTaxId => &mut self.issuer_tax_id,
            Field::IssuerAddress => &mut self.issuer_address,
            Field::ConsumerTaxId => &mut self.consumer_tax_id,
            Field::IssueDate => &mut self.issue_date,
            Field::InvoiceNumber => &mut self.invoice_number,
            Field::InvoiceSeries => &mut self.invoice_series,
            Field::TotalValue => &mut self.total_value,
            Field::PaymentMethod => &mut self.payment_method,
        }
    }

    /// Iterate over `(field, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &T)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}

/// Canonical payment category used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentCategory {
    /// Cash or PIX instant transfer.
    #[serde(rename = "cash_or_pix")]
    CashOrPix,
    /// Cards, bank slips and everything else.
    #[serde(rename = "other")]
    Other,
}

impl PaymentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentCategory::CashOrPix => "cash_or_pix",
            PaymentCategory::Other => "other",
        }
    }

    /// Parse an already-canonical category name. Exact match only.
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "cash_or_pix" => Some(PaymentCategory::CashOrPix),
            "other" => Some(PaymentCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
