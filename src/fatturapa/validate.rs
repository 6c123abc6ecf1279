//! FatturaPA profile rules.

use crate::core::{Invoice, ValidationFinding};

/// Italian profile rules, layered on the shared EN 16931 base.
pub fn validate_fatturapa(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // FPA-01: the transmitting seller needs a VAT identifier.
    if invoice.seller.vat_id.is_none() {
        findings.push(ValidationFinding::error(
            "FPA-01",
            "seller.vat_id",
            "FatturaPA requires the seller VAT identifier (IdFiscaleIVA)",
        ));
    }

    // FPA-02: Italian recipients are routed via a 7-character
    // CodiceDestinatario or a PEC address.
    if invoice.buyer.address.country_code == "IT" {
        let routed = match &invoice.buyer.electronic_address {
            Some(ea) if ea.value.contains('@') => true,
            Some(ea) => ea.value.len() == 7 && ea.value.chars().all(|c| c.is_ascii_alphanumeric()),
            None => false,
        };
        if !routed {
            findings.push(ValidationFinding::error(
                "FPA-02",
                "buyer.electronic_address",
                "Italian recipients require a 7-character recipient code or a PEC address",
            ));
        }
    }

    // FPA-03: SDI settles in euro.
    if invoice.currency_code != "EUR" {
        findings.push(
            ValidationFinding::warning(
                "FPA-03",
                "currency_code",
                "FatturaPA documents are normally denominated in EUR",
            )
            .with_values("EUR", &invoice.currency_code),
        );
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
        InvoiceBuilder::new("IT-1", NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
            .seller(
                PartyBuilder::new("Fornitore SRL", "Via Roma 1", "Milano", "20121", "IT")
                    .vat_id("IT01234567890")
                    .build(),
            )
            .buyer(
                PartyBuilder::new("Cliente SPA", "Via Torino 2", "Roma", "00184", "IT")
                    .electronic_address("0201", "ABC1234")
                    .build(),
            )
            .add_line(
                LineItemBuilder::new("1", "Consulenza", dec!(1), "C62", dec!(100))
                    .tax_rate(dec!(22))
                    .build(),
            )
            .build()
    }

    #[test]
    fn valid_invoice_passes() {
        assert!(validate_fatturapa(&invoice()).is_empty());
    }

    #[test]
    fn missing_seller_vat_id() {
        let mut inv = invoice();
        inv.seller.vat_id = None;
        assert!(validate_fatturapa(&inv).iter().any(|f| f.rule == "FPA-01"));
    }

    #[test]
    fn bad_recipient_code_rejected() {
        let mut inv = invoice();
        inv.buyer.electronic_address = Some(crate::core::ElectronicAddress {
            scheme: "0201".into(),
            value: "SHORT".into(),
        });
        assert!(validate_fatturapa(&inv).iter().any(|f| f.rule == "FPA-02"));
    }

    #[test]
    fn pec_address_satisfies_routing() {
        let mut inv = invoice();
        inv.buyer.electronic_address = Some(crate::core::ElectronicAddress {
            scheme: "EM".into(),
            value: "pec@cliente.it".into(),
        });
        assert!(!validate_fatturapa(&inv).iter().any(|f| f.rule == "FPA-02"));
    }

    #[test]
    fn foreign_buyer_needs_no_routing_code() {
        let mut inv = invoice();
        inv.buyer.address.country_code = "DE".into();
        inv.buyer.electronic_address = None;
        assert!(!validate_fatturapa(&inv).iter().any(|f| f.rule == "FPA-02"));
    }

    #[test]
    fn non_eur_is_warning() {
        let mut inv = invoice();
        inv.currency_code = "USD".into();
        let findings = validate_fatturapa(&inv);
        let f = findings.iter().find(|f| f.rule == "FPA-03").unwrap();
        assert_eq!(f.severity, crate::core::Severity::Warning);
    }
}
