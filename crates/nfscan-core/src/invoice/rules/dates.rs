//! Issue date grammar.

use super::patterns::ISSUE_DATE_FORM;

/// True when the value has the exact `DD/MM/YYYY` shape.
pub fn is_issue_date(value: &str) -> bool {
    ISSUE_DATE_FORM.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_date_shape() {
        assert!(is_issue_date("15/01/2024"));
        assert!(is_issue_date("99/99/9999"));
        assert!(!is_issue_date("15/1/2024"));
        assert!(!is_issue_date("2024-01-15"));
        assert!(!is_issue_date("15/01/24"));
        assert!(!is_issue_date(" 15/01/2024"));
    }
}
