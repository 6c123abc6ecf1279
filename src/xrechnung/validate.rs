//! XRechnung profile rules (BR-DE-*).

use crate::core::{Invoice, ValidationFinding};

/// German-specific rules, layered on the shared EN 16931 base.
pub fn validate_xrechnung(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // BR-DE-1: payment instructions must be provided.
    if invoice.payment.is_none() {
        findings.push(ValidationFinding::error(
            "BR-DE-1",
            "payment",
            "XRechnung requires payment instructions (BG-16)",
        ));
    }

    // BR-DE-2: seller contact block, BR-DE-5/6/7: the full triple.
    match &invoice.seller.contact {
        None => {
            findings.push(ValidationFinding::error(
                "BR-DE-2",
                "seller.contact",
                "XRechnung requires seller contact information (BG-6)",
            ));
        }
        Some(contact) => {
            if contact.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                findings.push(ValidationFinding::error(
                    "BR-DE-5",
                    "seller.contact.name",
                    "XRechnung requires a seller contact name (BT-41)",
                ));
            }
            if contact.phone.as_deref().is_none_or(|p| p.trim().is_empty()) {
                findings.push(ValidationFinding::error(
                    "BR-DE-6",
                    "seller.contact.phone",
                    "XRechnung requires a seller contact telephone (BT-42)",
                ));
            }
            if contact.email.as_deref().is_none_or(|e| e.trim().is_empty()) {
                findings.push(ValidationFinding::error(
                    "BR-DE-7",
                    "seller.contact.email",
                    "XRechnung requires a seller contact email (BT-43)",
                ));
            }
        }
    }

    // BR-DE-15: buyer reference (Leitweg-ID).
    if invoice
        .buyer_reference
        .as_deref()
        .is_none_or(|r| r.trim().is_empty())
    {
        findings.push(ValidationFinding::error(
            "BR-DE-15",
            "buyer_reference",
            "XRechnung requires the buyer reference / Leitweg-ID (BT-10)",
        ));
    }

    // BR-DE-16: seller VAT id or tax number.
    if invoice.seller.vat_id.is_none() && invoice.seller.tax_number.is_none() {
        findings.push(ValidationFinding::error(
            "BR-DE-16",
            "seller",
            "XRechnung requires a seller VAT ID (BT-31) or tax number (BT-32)",
        ));
    }

    // BR-DE-26: seller electronic address.
    if invoice.seller.electronic_address.is_none() {
        findings.push(ValidationFinding::error(
            "BR-DE-26",
            "seller.electronic_address",
            "XRechnung requires a seller electronic address (BT-34)",
        ));
    }

    // BR-DE-28: buyer electronic address.
    if invoice.buyer.electronic_address.is_none() {
        findings.push(ValidationFinding::error(
            "BR-DE-28",
            "buyer.electronic_address",
            "XRechnung requires a buyer electronic address (BT-49)",
        ));
    }

    // BR-DE-24: SEPA credit transfer requires an IBAN.
    if let Some(payment) = &invoice.payment {
        if payment.means_code.code() == 58 {
            let has_iban = payment
                .credit_transfer
                .as_ref()
                .is_some_and(|ct| !ct.iban.trim().is_empty());
            if !has_iban {
                findings.push(ValidationFinding::error(
                    "BR-DE-24",
                    "payment.credit_transfer",
                    "SEPA credit transfer (58) requires a payment account with IBAN (BT-84)",
                ));
            }
        }
    }

    findings
}
