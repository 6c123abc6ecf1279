//! CIUS-RO profile rules (BR-RO-*).

use crate::core::{Invoice, ValidationFinding};

/// Romanian profile rules, layered on the shared EN 16931 base.
pub fn validate_ciusro(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // BR-RO-02: Romanian sellers are identified by a fiscal code (CUI)
    // or VAT identifier.
    if invoice.seller.address.country_code == "RO"
        && invoice.seller.vat_id.is_none()
        && invoice.seller.tax_number.is_none()
    {
        findings.push(ValidationFinding::error(
            "BR-RO-02",
            "seller",
            "CIUS-RO requires a Romanian seller to carry a CUI or VAT identifier",
        ));
    }

    // BR-RO-03: e-Factura settles in RON or EUR.
    if invoice.currency_code != "RON" && invoice.currency_code != "EUR" {
        findings.push(
            ValidationFinding::warning(
                "BR-RO-03",
                "currency_code",
                "CIUS-RO invoices are normally denominated in RON or EUR",
            )
            .with_values("RON|EUR", &invoice.currency_code),
        );
    }

    // BR-RO-04: Romanian postal codes are six digits.
    for (prefix, party) in [("seller", &invoice.seller), ("buyer", &invoice.buyer)] {
        if party.address.country_code == "RO" {
            let pc = &party.address.postal_code;
            if pc.len() != 6 || !pc.chars().all(|c| c.is_ascii_digit()) {
                findings.push(ValidationFinding::warning(
                    "BR-RO-04",
                    format!("{prefix}.address.postal_code"),
                    "Romanian postal codes are six digits",
                ));
            }
        }
    }

    findings
}
