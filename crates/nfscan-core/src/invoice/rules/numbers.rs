//! Invoice number and series grammars.

use super::patterns::{INVOICE_NUMBER_FORM, INVOICE_SERIES_FORM};

/// Exactly 6 or exactly 9 digits.
pub fn is_invoice_number(value: &str) -> bool {
    INVOICE_NUMBER_FORM.is_match(value)
}

/// Exactly 3 digits.
pub fn is_invoice_series(value: &str) -> bool {
    INVOICE_SERIES_FORM.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_lengths() {
        assert!(is_invoice_number("123456"));
        assert!(is_invoice_number("123456789"));
        assert!(!is_invoice_number("12345"));
        assert!(!is_invoice_number("1234567"));
        assert!(!is_invoice_number("12345678"));
        assert!(!is_invoice_number("1234567890"));
        assert!(!is_invoice_number("12345a"));
    }

    #[test]
    fn test_invoice_series_lengths() {
        assert!(is_invoice_series("001"));
        assert!(!is_invoice_series("01"));
        assert!(!is_invoice_series("0001"));
        assert!(!is_invoice_series("1a2"));
    }
}
