//! CPF/CNPJ (Brazilian taxpayer identifiers) normalization.
//!
//! A CPF has 11 digits and displays as `DDD.DDD.DDD-DD`; a CNPJ has 14 digits
//! and displays as `DD.DDD.DDD/DDDD-DD`. Only the digit count and the
//! punctuation are checked; check digits are not verified.

use super::patterns::{CNPJ_FORM, CPF_FORM, RAW_CNPJ, RAW_TAX_ID};

/// Strip everything but ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format an 11- or 14-digit string into its punctuated form.
///
/// Any other input is returned unchanged, which makes the function
/// idempotent on values that are already punctuated.
pub fn format_tax_id(value: &str) -> String {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return value.to_string();
    }

    match value.len() {
        14 => format!(
            "{}.{}.{}/{}-{}",
            &value[0..2],
            &value[2..5],
            &value[5..8],
            &value[8..12],
            &value[12..14]
        ),
        11 => format!(
            "{}.{}.{}-{}",
            &value[0..3],
            &value[3..6],
            &value[6..9],
            &value[9..11]
        ),
        _ => value.to_string(),
    }
}

/// Normalize a consumer identifier: CPF or CNPJ, raw or punctuated.
pub fn normalize_consumer_tax_id(value: &str) -> Option<String> {
    if RAW_TAX_ID.is_match(value) {
        Some(format_tax_id(value))
    } else if CPF_FORM.is_match(value) || CNPJ_FORM.is_match(value) {
        Some(value.to_string())
    } else {
        None
    }
}

/// Normalize an issuer identifier: CNPJ only, raw or punctuated.
pub fn normalize_issuer_tax_id(value: &str) -> Option<String> {
    if RAW_CNPJ.is_match(value) {
        Some(format_tax_id(value))
    } else if CNPJ_FORM.is_match(value) {
        Some(value.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_tax_id("12345678000195"), "12.345.678/0001-95");
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_tax_id("12345678909"), "123.456.789-09");
    }

    #[test]
    fn test_format_leaves_other_lengths() {
        assert_eq!(format_tax_id("1234567890"), "1234567890");
        assert_eq!(format_tax_id(""), "");
        assert_eq!(format_tax_id("ção"), "ção");
    }

    #[test]
    fn test_format_is_bijective_and_idempotent() {
        let samples = [
            "00000000000",
            "12345678909",
            "98765432100",
            "00000000000000",
            "12345678000195",
            "99999999999999",
        ];
        let mut formatted = Vec::new();
        for raw in samples {
            let once = format_tax_id(raw);
            assert_eq!(digits_only(&once), raw);
            assert_eq!(format_tax_id(&once), once);
            assert!(CPF_FORM.is_match(&once) || CNPJ_FORM.is_match(&once));
            formatted.push(once);
        }
        formatted.sort();
        formatted.dedup();
        assert_eq!(formatted.len(), samples.len());
    }

    #[test]
    fn test_normalize_consumer() {
        assert_eq!(
            normalize_consumer_tax_id("12345678909").as_deref(),
            Some("123.456.789-09")
        );
        assert_eq!(
            normalize_consumer_tax_id("12345678000195").as_deref(),
            Some("12.345.678/0001-95")
        );
        assert_eq!(
            normalize_consumer_tax_id("123.456.789-09").as_deref(),
            Some("123.456.789-09")
        );
        assert_eq!(normalize_consumer_tax_id("123.456.789"), None);
        assert_eq!(normalize_consumer_tax_id("1234567890"), None);
        assert_eq!(normalize_consumer_tax_id("CPF 12345678909"), None);
    }

    #[test]
    fn test_normalize_issuer_rejects_cpf() {
        assert_eq!(
            normalize_issuer_tax_id("12345678000195").as_deref(),
            Some("12.345.678/0001-95")
        );
        assert_eq!(
            normalize_issuer_tax_id("12.345.678/0001-95").as_deref(),
            Some("12.345.678/0001-95")
        );
        assert_eq!(normalize_issuer_tax_id("12345678909"), None);
        assert_eq!(normalize_issuer_tax_id("123.456.789-09"), None);
    }
}
