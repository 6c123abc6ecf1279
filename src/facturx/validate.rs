//! Factur-X profile rules.

use crate::core::{Invoice, ValidationFinding};

/// Factur-X (EN 16931 profile) rules, layered on the shared base.
pub fn validate_facturx(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // FX-01: the seller must be identifiable for tax purposes.
    if invoice.seller.vat_id.is_none() && invoice.seller.tax_number.is_none() {
        findings.push(ValidationFinding::error(
            "FX-01",
            "seller",
            "Factur-X requires a seller VAT identifier or tax registration",
        ));
    }

    // FX-02: payment terms or a due date let the recipient automate
    // settlement.
    if invoice.due_date.is_none() && invoice.payment_terms.is_none() {
        findings.push(ValidationFinding::warning(
            "FX-02",
            "due_date",
            "neither a due date nor payment terms are present",
        ));
    }

    findings
}
