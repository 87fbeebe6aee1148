//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Draft patterns, applied to the whole document text.
    pub static ref ISSUER_NAME: Regex = Regex::new(
        r"(?i)[\w ]+ LTDA\b"
    ).unwrap();

    pub static ref ISSUER_TAX_ID: Regex = Regex::new(
        r"\b\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b|\b\d{14}\b"
    ).unwrap();

    pub static ref ISSUER_ADDRESS: Regex = Regex::new(
        r"(?i)\b(?:AVENIDA|RUA|TRAVESSA|ALAMEDA|AV|RODOVIA)\.?\s+[\w\s,.-]+?CEP\s*:?\s*\d{5}-\d{3}"
    ).unwrap();

    pub static ref CONSUMER_TAX_ID: Regex = Regex::new(
        r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b|\b\d{11}\b"
    ).unwrap();

    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"\b\d{2}/\d{2}/\d{4}\b"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"\b(?:\d{9}|\d{6})\b"
    ).unwrap();

    // SAT fiscal device line, e.g. "SAT No. 000123"
    pub static ref INVOICE_SERIES: Regex = Regex::new(
        r"(?i)\bSAT\s+N[oº°]?\.?\s*0*(\d{3})\b"
    ).unwrap();

    pub static ref TOTAL_VALUE: Regex = Regex::new(
        r"(?i)\bTOTAL\s+R\$\s*:?\s*(\d(?:[\d.,]*\d)?)"
    ).unwrap();

    pub static ref PAYMENT_TOKEN: Regex = Regex::new(
        r"(?i)\b(pix|dinheiro|cash|cart[ãa]o|card|cr[ée]dito|credit|d[ée]bito|debit)\b"
    ).unwrap();

    // Values re-derived from labelled lines.
    pub static ref LABELLED_ISSUER_TAX_ID: Regex = Regex::new(
        r"\b\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b|\b\d{14}\b"
    ).unwrap();

    pub static ref LABELLED_CONSUMER_TAX_ID: Regex = Regex::new(
        r"\b(?:\d{14}|\d{11}|\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}|\d{3}\.\d{3}\.\d{3}-\d{2})\b"
    ).unwrap();

    pub static ref LABELLED_INVOICE_NUMBER: Regex = Regex::new(
        r"\b(?:\d{9}|\d{6})\b"
    ).unwrap();

    pub static ref LABELLED_INVOICE_SERIES: Regex = Regex::new(
        r"\b\d{3}\b"
    ).unwrap();

    // A whole amount token, optionally with `.` thousands groups.
    pub static ref LABELLED_TOTAL_VALUE: Regex = Regex::new(
        r"(?:^|[\s:])(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:[,.]\d{1,2})?)(?:\s|$)"
    ).unwrap();

    // Accepted final forms.
    pub static ref INVOICE_NUMBER_FORM: Regex = Regex::new(r"^(?:\d{6}|\d{9})$").unwrap();

    pub static ref INVOICE_SERIES_FORM: Regex = Regex::new(r"^\d{3}$").unwrap();

    pub static ref TOTAL_VALUE_FORM: Regex = Regex::new(r"^(\d+)(?:[,.](\d{1,2}))?$").unwrap();

    pub static ref GROUPED_AMOUNT_FORM: Regex = Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?$").unwrap();

    pub static ref RAW_TAX_ID: Regex = Regex::new(r"^(?:\d{11}|\d{14})$").unwrap();

    pub static ref RAW_CNPJ: Regex = Regex::new(r"^\d{14}$").unwrap();

    pub static ref CPF_FORM: Regex = Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").unwrap();

    pub static ref CNPJ_FORM: Regex = Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$").unwrap();

    pub static ref ISSUE_DATE_FORM: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}
