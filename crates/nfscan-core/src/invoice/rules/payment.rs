//! Payment method detection and canonicalization.

use crate::models::fields::PaymentCategory;

use super::patterns::PAYMENT_TOKEN;
use super::FieldExtractor;

/// Finds the first payment token in text.
pub struct PaymentExtractor;

impl PaymentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PaymentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PaymentExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        PAYMENT_TOKEN.find(text).map(|m| m.as_str().to_string())
    }
}

/// Map a raw payment token to its category.
///
/// Tokens naming PIX or cash (`pix`, `cash`, `dinheiro`, any case) are
/// [`PaymentCategory::CashOrPix`]; every other token, and no token at all,
/// is [`PaymentCategory::Other`].
pub fn canonical_payment(token: Option<&str>) -> PaymentCategory {
    let Some(token) = token else {
        return PaymentCategory::Other;
    };
    let token = token.to_lowercase();
    if token.contains("pix") || token.contains("cash") || token.contains("dinheiro") {
        PaymentCategory::CashOrPix
    } else {
        PaymentCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_cash_tokens() {
        for token in ["pix", "PIX", "Pix", "cash", "CASH", "Dinheiro", "pix/cash", "Cashback"] {
            assert_eq!(canonical_payment(Some(token)), PaymentCategory::CashOrPix, "{token}");
        }
    }

    #[test]
    fn test_canonical_other_tokens() {
        for token in ["card", "Cartão", "Crédito", "debit", "boleto", ""] {
            assert_eq!(canonical_payment(Some(token)), PaymentCategory::Other, "{token}");
        }
        assert_eq!(canonical_payment(None), PaymentCategory::Other);
    }

    #[test]
    fn test_extract_first_token() {
        let extractor = PaymentExtractor::new();
        let token = extractor
            .extract("FORMA DE PAGAMENTO\nCartão de Crédito 50,00\nPix 0,00")
            .unwrap();
        assert_eq!(token, "Cartão");

        let token = extractor.extract("Valor pago em DINHEIRO").unwrap();
        assert_eq!(token, "DINHEIRO");

        assert!(extractor.extract("Boleto bancario").is_none());
    }

    #[test]
    fn test_token_must_be_whole_word() {
        assert!(PaymentExtractor::new().extract("Pixel Store").is_none());
    }
}
