//! Peppol BIS Billing 3.0 profile rules (PEPPOL-EN16931-R*).

use rust_decimal::Decimal;

use crate::core::{Invoice, ValidationFinding};

/// Peppol-specific rules, layered on the shared EN 16931 base.
pub fn validate_peppol(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // PEPPOL-EN16931-R003: buyer reference or order reference required.
    if invoice.buyer_reference.is_none() && invoice.order_reference.is_none() {
        findings.push(ValidationFinding::error(
            "PEPPOL-EN16931-R003",
            "buyer_reference",
            "a buyer reference or purchase order reference is required",
        ));
    }

    // PEPPOL-EN16931-R020: seller electronic address.
    if invoice.seller.electronic_address.is_none() {
        findings.push(ValidationFinding::error(
            "PEPPOL-EN16931-R020",
            "seller.electronic_address",
            "seller electronic address (EndpointID) is required",
        ));
    }

    // PEPPOL-EN16931-R010: buyer electronic address.
    if invoice.buyer.electronic_address.is_none() {
        findings.push(ValidationFinding::error(
            "PEPPOL-EN16931-R010",
            "buyer.electronic_address",
            "buyer electronic address (EndpointID) is required",
        ));
    }

    // PEPPOL-EN16931-R121: quantities must be positive.
    for (i, line) in invoice.lines.iter().enumerate() {
        if line.quantity <= Decimal::ZERO {
            findings.push(ValidationFinding::error(
                "PEPPOL-EN16931-R121",
                format!("lines[{i}].quantity"),
                "invoiced quantity must be positive",
            ));
        }
    }

    findings
}
