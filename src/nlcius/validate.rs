//! NLCIUS profile rules (BR-NL-*).

use crate::core::{Invoice, ValidationFinding};

/// Dutch profile rules, layered on the shared EN 16931 base.
pub fn validate_nlcius(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // BR-NL-1: Dutch sellers carry a legal registration (KvK/OIN) or
    // VAT identifier.
    if invoice.seller.address.country_code == "NL"
        && invoice.seller.vat_id.is_none()
        && invoice.seller.tax_number.is_none()
    {
        findings.push(ValidationFinding::error(
            "BR-NL-1",
            "seller",
            "NLCIUS requires a Dutch seller to carry a legal registration or VAT identifier",
        ));
    }

    // BR-NL-10: for Dutch buyers a street address is mandatory (checked
    // at base level too, but NLCIUS raises it from the recommended to
    // the required tier).
    if invoice.buyer.address.country_code == "NL"
        && invoice.buyer.address.street.trim().is_empty()
    {
        findings.push(ValidationFinding::error(
            "BR-NL-10",
            "buyer.address.street",
            "NLCIUS requires the buyer street address",
        ));
    }

    // BR-NL-11: a payment reference without payment instructions is
    // unusable for reconciliation.
    if invoice.payment.is_none() && invoice.due_date.is_some() {
        findings.push(ValidationFinding::warning(
            "BR-NL-11",
            "payment",
            "a due date without payment instructions cannot be reconciled",
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        InvoiceBuilder::new("NL-1", NaiveDate::from_ymd_opt(2026, 4, 1).unwrap())
            .seller(
                PartyBuilder::new("Leverancier BV", "Keizersgracht 1", "Amsterdam", "1015 CJ", "NL")
                    .vat_id("NL123456789B01")
                    .build(),
            )
            .buyer(
                PartyBuilder::new("Afnemer BV", "Coolsingel 10", "Rotterdam", "3011 AD", "NL")
                    .build(),
            )
            .add_line(
                LineItemBuilder::new("1", "Advies", dec!(8), "HUR", dec!(125))
                    .tax_rate(dec!(21))
                    .build(),
            )
            .build()
    }

    #[test]
    fn valid_invoice_passes() {
        assert!(validate_nlcius(&invoice()).is_empty());
    }

    #[test]
    fn dutch_seller_without_registration() {
        let mut inv = invoice();
        inv.seller.vat_id = None;
        assert!(validate_nlcius(&inv).iter().any(|f| f.rule == "BR-NL-1"));
    }

    #[test]
    fn foreign_seller_exempt_from_nl_registration() {
        let mut inv = invoice();
        inv.seller.vat_id = None;
        inv.seller.address.country_code = "DE".into();
        assert!(!validate_nlcius(&inv).iter().any(|f| f.rule == "BR-NL-1"));
    }

    #[test]
    fn missing_buyer_street() {
        let mut inv = invoice();
        inv.buyer.address.street = " ".into();
        assert!(validate_nlcius(&inv).iter().any(|f| f.rule == "BR-NL-10"));
    }
}
