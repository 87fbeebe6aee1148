//! Total value normalization.

use super::patterns::{GROUPED_AMOUNT_FORM, TOTAL_VALUE_FORM};

/// Normalize a total value into `<integer>.<two digits>`.
///
/// Accepts digits with an optional one- or two-digit fraction separated by a
/// comma or a dot. Leading zeros of the integer part are stripped (one digit
/// is always kept) and the fraction is right-padded to two digits.
/// Returns `None` for anything else.
pub fn normalize_total_value(value: &str) -> Option<String> {
    let caps = TOTAL_VALUE_FORM.captures(value)?;

    let integer = caps[1].trim_start_matches('0');
    let integer = if integer.is_empty() { "0" } else { integer };
    let fraction = caps.get(2).map_or("", |m| m.as_str());

    Some(format!("{}.{:0<2}", integer, fraction))
}

/// Drop `.` thousands separators from a grouped amount (`1.234,56` becomes
/// `1234,56`). Any other value is returned unchanged.
pub fn ungroup_amount(value: &str) -> String {
    if GROUPED_AMOUNT_FORM.is_match(value) {
        value.replace('.', "")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_zeros_and_pads() {
        assert_eq!(normalize_total_value("0050,5").as_deref(), Some("50.50"));
        assert_eq!(normalize_total_value("12,34").as_deref(), Some("12.34"));
        assert_eq!(normalize_total_value("12").as_deref(), Some("12.00"));
        assert_eq!(normalize_total_value("007").as_deref(), Some("7.00"));
        assert_eq!(normalize_total_value("0,99").as_deref(), Some("0.99"));
        assert_eq!(normalize_total_value("000").as_deref(), Some("0.00"));
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        assert_eq!(normalize_total_value("1.234,56"), None);
        assert_eq!(normalize_total_value("12,345"), None);
        assert_eq!(normalize_total_value("R$ 12,00"), None);
        assert_eq!(normalize_total_value("-5.00"), None);
        assert_eq!(normalize_total_value(""), None);
        assert_eq!(normalize_total_value("12."), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["0050,5", "1", "10.1", "99,99", "0001.00", "0", "123456789,10"] {
            let once = normalize_total_value(raw).unwrap();
            assert_eq!(normalize_total_value(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_ungroup_amount() {
        assert_eq!(ungroup_amount("1.234,56"), "1234,56");
        assert_eq!(ungroup_amount("1.234.567"), "1234567");
        assert_eq!(ungroup_amount("12.50"), "12.50");
        assert_eq!(ungroup_amount("34,40"), "34,40");
        assert_eq!(normalize_total_value(&ungroup_amount("1.234,56")).as_deref(), Some("1234.56"));
    }
}
