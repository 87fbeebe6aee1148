//! Instruction contract sent with every generation request.

/// System instruction for the generative extractor.
pub const SYSTEM_PROMPT: &str = r#"Extract the following data from a Brazilian invoice (nota fiscal) and return it as JSON:
issuer name, issuer CNPJ, issuer address, consumer CNPJ or CPF, issue date,
invoice number, invoice series, total value and payment method.

The text was produced by automatic recognition and may contain errors. Identify
those errors and discard them by setting the affected fields to null.

Do not copy the payment method as written. Use exactly one of:
"cash_or_pix" for cash (dinheiro) or PIX; "other" for credit card, debit card,
bank slip (boleto) or anything else.

If a field is not found, set it to null. Never invent values that are not in the text.
The issuer name may be split across line breaks.
Check that the CNPJ or CPF is well formed; otherwise set it to null.

Invoice number: has 6 or 9 digits. Any other length must be null.
Invoice series: always exactly 3 digits. Any other length must be null.

If the date is in US order, convert it to DD/MM/YYYY. If it does not make sense
as a date, set it to null.

Output format:

{
"issuer_name": "<issuer name>",
"issuer_tax_id": "00.000.000/0000-00",
"issuer_address": "<issuer address>",
"consumer_tax_id": "000.000.000-00",
"issue_date": "00/00/0000",
"invoice_number": "123456",
"invoice_series": "123",
"total_value": "0000.00",
"payment_method": "<cash_or_pix/other>"
}

Write nothing but the JSON output. No explanations or extra text."#;

/// User message wrapping the document text.
pub fn user_prompt(text: &str) -> String {
    format!("Invoice text:\n\n{}", text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::Field;

    #[test]
    fn test_prompt_names_every_key() {
        for field in Field::ALL {
            assert!(SYSTEM_PROMPT.contains(&format!("\"{}\"", field.key())), "{field}");
        }
    }

    #[test]
    fn test_user_prompt_carries_text() {
        assert!(user_prompt("Invoice Number: 123456").ends_with("\n\nInvoice Number: 123456"));
    }
}
