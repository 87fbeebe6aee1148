//! Deterministic pattern-based draft of a document's fields.

use tracing::{debug, info};

use crate::models::fields::{Field, FieldSet};
use crate::models::record::{DraftValue, PatternDraft, RawDocument};

use super::rules::patterns::{
    CONSUMER_TAX_ID, INVOICE_NUMBER, INVOICE_SERIES, ISSUER_ADDRESS, ISSUER_NAME, ISSUER_TAX_ID,
    ISSUE_DATE, TOTAL_VALUE,
};
use super::rules::{canonical_payment, FieldExtractor, PatternRule, PaymentExtractor};

/// Applies one pattern per field to the full document text.
///
/// Never fails: a pattern that does not match leaves the slot
/// [`DraftValue::NotFound`]. The payment method slot is always filled with
/// its canonical category.
pub struct PatternExtractor {
    payment: PaymentExtractor,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self {
            payment: PaymentExtractor::new(),
        }
    }

    /// Draft the fields of an extracted document.
    pub fn extract(&self, document: &RawDocument) -> PatternDraft {
        self.extract_text(&document.text())
    }

    /// Draft the fields of newline-joined text.
    pub fn extract_text(&self, text: &str) -> PatternDraft {
        info!("Drafting fields from {} characters of text", text.len());

        let fields = FieldSet::from_fn(|field| match field {
            Field::PaymentMethod => {
                let token = self.payment.extract(text);
                let category = canonical_payment(token.as_deref());
                debug!("Payment token {:?} -> {}", token, category);
                DraftValue::Found(category.as_str().to_string())
            }
            _ => match rule_for(field).and_then(|rule| rule.extract(text)) {
                Some(value) => DraftValue::Found(value),
                None => DraftValue::NotFound,
            },
        });

        let found = fields
            .iter()
            .filter(|(_, v)| matches!(v, DraftValue::Found(_)))
            .count();
        debug!("Draft located {}/9 fields", found);

        PatternDraft { fields }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn rule_for(field: Field) -> Option<PatternRule> {
    let pattern = match field {
        Field::IssuerName => &*ISSUER_NAME,
        Field::IssuerTaxId => &*ISSUER_TAX_ID,
        Field::IssuerAddress => &*ISSUER_ADDRESS,
        Field::ConsumerTaxId => &*CONSUMER_TAX_ID,
        Field::IssueDate => &*ISSUE_DATE,
        Field::InvoiceNumber => &*INVOICE_NUMBER,
        Field::InvoiceSeries => &*INVOICE_SERIES,
        Field::TotalValue => &*TOTAL_VALUE,
        Field::PaymentMethod => return None,
    };
    Some(PatternRule::new(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = "\
SUPERMERCADO BOM PRECO LTDA
RUA DAS FLORES, 123 CENTRO SAO PAULO SP CEP 01310-100
CNPJ: 12.345.678/0001-95
Extrato No. 004521
CUPOM FISCAL ELETRONICO - SAT
CPF/CNPJ do Consumidor: 12345678909
ARROZ 5KG 1 UN 25,90
FEIJAO 1KG 1 UN 8,50
TOTAL R$ : 34,40
Pix 34,40
SAT No. 000123
15/01/2024 10:32:11";

    fn found(v: &str) -> DraftValue {
        DraftValue::Found(v.to_string())
    }

    #[test]
    fn test_extract_full_receipt() {
        let lines = RECEIPT.lines().map(String::from).collect();
        let doc = RawDocument::new("inv1.png", "bucket", lines);
        let draft = PatternExtractor::new().extract(&doc);

        assert_eq!(draft.get(Field::IssuerName), &found("SUPERMERCADO BOM PRECO LTDA"));
        assert_eq!(
            draft.get(Field::IssuerAddress),
            &found("RUA DAS FLORES, 123 CENTRO SAO PAULO SP CEP 01310-100")
        );
        assert_eq!(draft.get(Field::IssuerTaxId), &found("12.345.678/0001-95"));
        assert_eq!(draft.get(Field::ConsumerTaxId), &found("12345678909"));
        assert_eq!(draft.get(Field::IssueDate), &found("15/01/2024"));
        assert_eq!(draft.get(Field::InvoiceNumber), &found("004521"));
        assert_eq!(draft.get(Field::InvoiceSeries), &found("123"));
        assert_eq!(draft.get(Field::TotalValue), &found("34,40"));
        assert_eq!(draft.get(Field::PaymentMethod), &found("cash_or_pix"));
    }

    #[test]
    fn test_missing_fields_are_not_found() {
        let draft = PatternExtractor::new().extract_text("nothing useful here");
        for field in Field::ALL {
            if field == Field::PaymentMethod {
                assert_eq!(draft.get(field), &found("other"));
            } else {
                assert_eq!(draft.get(field), &DraftValue::NotFound, "{field}");
            }
        }
    }

    #[test]
    fn test_card_payment_is_other() {
        let draft = PatternExtractor::new().extract_text("Cartao de Credito 10,00\nTOTAL R$ 10,00");
        assert_eq!(draft.get(Field::PaymentMethod), &found("other"));
        assert_eq!(draft.get(Field::TotalValue), &found("10,00"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = PatternExtractor::new();
        assert_eq!(extractor.extract_text(RECEIPT), extractor.extract_text(RECEIPT));
    }
}
