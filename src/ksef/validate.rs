//! KSeF profile rules.

use crate::core::{Invoice, Party, ValidationFinding};

/// Extract a party's Polish NIP: the tax number when it is 10 digits,
/// else the VAT identifier with its `PL` prefix stripped.
pub fn party_nip(party: &Party) -> Option<String> {
    if let Some(tax_number) = &party.tax_number {
        let digits: String = tax_number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 10 {
            return Some(digits);
        }
    }
    if let Some(vat_id) = &party.vat_id {
        let digits: String = vat_id
            .trim_start_matches("PL")
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.len() == 10 {
            return Some(digits);
        }
    }
    None
}

/// Polish profile rules, layered on the shared EN 16931 base.
pub fn validate_ksef(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // KSEF-01: the issuing seller is identified by a 10-digit NIP.
    if party_nip(&invoice.seller).is_none() {
        findings.push(ValidationFinding::error(
            "KSEF-01",
            "seller.tax_number",
            "KSeF requires a 10-digit seller NIP",
        ));
    }

    // KSEF-02: B2B documents also identify the buyer by NIP.
    if invoice.buyer.address.country_code == "PL" && party_nip(&invoice.buyer).is_none() {
        findings.push(ValidationFinding::warning(
            "KSEF-02",
            "buyer.tax_number",
            "Polish buyers are normally identified by a 10-digit NIP",
        ));
    }

    // KSEF-03: settlement currency.
    if invoice.currency_code != "PLN" {
        findings.push(
            ValidationFinding::warning(
                "KSEF-03",
                "currency_code",
                "KSeF invoices are normally denominated in PLN",
            )
            .with_values("PLN", &invoice.currency_code),
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
        InvoiceBuilder::new("FV-1", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
            .currency("PLN")
            .seller(
                PartyBuilder::new("Dostawca Sp. z o.o.", "ul. Prosta 1", "Warszawa", "00-001", "PL")
                    .tax_number("5260250995")
                    .build(),
            )
            .buyer(
                PartyBuilder::new("Nabywca SA", "ul. Długa 2", "Kraków", "30-001", "PL")
                    .tax_number("6762334567")
                    .build(),
            )
            .add_line(
                LineItemBuilder::new("1", "Usługa", dec!(1), "C62", dec!(100))
                    .tax_rate(dec!(23))
                    .build(),
            )
            .build()
    }

    #[test]
    fn valid_invoice_passes() {
        assert!(validate_ksef(&invoice()).is_empty());
    }

    #[test]
    fn nip_from_vat_id_prefix() {
        let mut inv = invoice();
        inv.seller.tax_number = None;
        inv.seller.vat_id = Some("PL5260250995".into());
        assert!(validate_ksef(&inv).is_empty());
        assert_eq!(party_nip(&inv.seller).unwrap(), "5260250995");
    }

    #[test]
    fn missing_seller_nip_is_error() {
        let mut inv = invoice();
        inv.seller.tax_number = Some("123".into());
        inv.seller.vat_id = None;
        assert!(validate_ksef(&inv).iter().any(|f| f.rule == "KSEF-01"));
    }

    #[test]
    fn missing_buyer_nip_is_warning() {
        let mut inv = invoice();
        inv.buyer.tax_number = None;
        let findings = validate_ksef(&inv);
        let f = findings.iter().find(|f| f.rule == "KSEF-02").unwrap();
        assert_eq!(f.severity, crate::core::Severity::Warning);
    }

    #[test]
    fn non_pln_is_warning() {
        let mut inv = invoice();
        inv.currency_code = "EUR".into();
        assert!(validate_ksef(&inv).iter().any(|f| f.rule == "KSEF-03"));
    }
}
