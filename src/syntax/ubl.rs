//! UBL 2.1 invoice writer, shared by every UBL-based standard
//! (XRechnung-UBL, Peppol BIS, NLCIUS, CIUS-RO).
//!
//! The element sequence follows the UBL schema exactly — reordering any
//! sibling group fails schematron validation downstream.

use rust_decimal::Decimal;

use super::{XmlResult, XmlWriter, format_decimal, ubl_ns};
use crate::core::breakdown::{self, allowance_category, line_category};
use crate::core::money;
use crate::core::types::*;
use crate::peppol::eas::detect_scheme;

/// Identifiers distinguishing one UBL-based standard from another.
pub struct UblProfile {
    /// BT-24: Specification / customization identifier.
    pub customization_id: &'static str,
    /// BT-23: Business process profile identifier.
    pub profile_id: &'static str,
}

/// Generate a UBL 2.1 Invoice (or CreditNote) document.
pub fn write_invoice(invoice: &Invoice, profile: &UblProfile) -> XmlResult {
    let currency = &invoice.currency_code;
    let is_credit_note = invoice.type_code == InvoiceTypeCode::CreditNote;
    let (root_tag, root_ns, line_tag, qty_tag, type_tag) = if is_credit_note {
        (
            "ubl:CreditNote",
            ubl_ns::CREDIT_NOTE,
            "cac:CreditNoteLine",
            "cbc:CreditedQuantity",
            "cbc:CreditNoteTypeCode",
        )
    } else {
        (
            "ubl:Invoice",
            ubl_ns::INVOICE,
            "cac:InvoiceLine",
            "cbc:InvoicedQuantity",
            "cbc:InvoiceTypeCode",
        )
    };

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs(
        root_tag,
        &[
            ("xmlns:ubl", root_ns),
            ("xmlns:cac", ubl_ns::CAC),
            ("xmlns:cbc", ubl_ns::CBC),
        ],
    )?;

    w.text_element("cbc:CustomizationID", profile.customization_id)?;
    w.text_element("cbc:ProfileID", profile.profile_id)?;
    w.text_element("cbc:ID", &invoice.number)?;
    w.text_element("cbc:IssueDate", &invoice.issue_date.to_string())?;
    if let Some(due) = &invoice.due_date {
        w.text_element("cbc:DueDate", &due.to_string())?;
    }
    w.text_element(type_tag, &invoice.type_code.code().to_string())?;
    for note in &invoice.notes {
        w.opt_text_element("cbc:Note", Some(note))?;
    }
    w.text_element("cbc:DocumentCurrencyCode", currency)?;
    w.opt_text_element("cbc:BuyerReference", invoice.buyer_reference.as_deref())?;

    if let Some(period) = &invoice.billing_period {
        w.start_element("cac:InvoicePeriod")?;
        w.text_element("cbc:StartDate", &period.start.to_string())?;
        w.text_element("cbc:EndDate", &period.end.to_string())?;
        w.end_element("cac:InvoicePeriod")?;
    }

    if let Some(or) = &invoice.order_reference {
        w.start_element("cac:OrderReference")?;
        w.text_element("cbc:ID", or)?;
        w.end_element("cac:OrderReference")?;
    }

    if let Some(pi) = &invoice.preceding_invoice {
        w.start_element("cac:BillingReference")?;
        w.start_element("cac:InvoiceDocumentReference")?;
        w.text_element("cbc:ID", &pi.number)?;
        if let Some(d) = &pi.issue_date {
            w.text_element("cbc:IssueDate", &d.to_string())?;
        }
        w.end_element("cac:InvoiceDocumentReference")?;
        w.end_element("cac:BillingReference")?;
    }

    write_party(&mut w, &invoice.seller, "cac:AccountingSupplierParty")?;
    write_party(&mut w, &invoice.buyer, "cac:AccountingCustomerParty")?;

    if let Some(payment) = &invoice.payment {
        w.start_element("cac:PaymentMeans")?;
        w.text_element("cbc:PaymentMeansCode", &payment.means_code.code().to_string())?;
        w.opt_text_element("cbc:PaymentID", payment.remittance_info.as_deref())?;
        if let Some(ct) = &payment.credit_transfer {
            w.start_element("cac:PayeeFinancialAccount")?;
            w.text_element("cbc:ID", &ct.iban)?;
            w.opt_text_element("cbc:Name", ct.account_name.as_deref())?;
            if let Some(bic) = &ct.bic {
                w.start_element("cac:FinancialInstitutionBranch")?;
                w.text_element("cbc:ID", bic)?;
                w.end_element("cac:FinancialInstitutionBranch")?;
            }
            w.end_element("cac:PayeeFinancialAccount")?;
        }
        w.end_element("cac:PaymentMeans")?;
    }

    if let Some(terms) = &invoice.payment_terms {
        w.start_element("cac:PaymentTerms")?;
        w.text_element("cbc:Note", terms)?;
        w.end_element("cac:PaymentTerms")?;
    }

    for ac in &invoice.allowance_charges {
        write_allowance_charge(&mut w, ac, currency)?;
    }

    write_tax_total(&mut w, invoice, currency)?;
    write_monetary_total(&mut w, invoice, currency)?;

    for line in &invoice.lines {
        write_line(&mut w, line, currency, line_tag, qty_tag)?;
    }

    w.end_element(root_tag)?;
    w.into_string()
}

fn write_party(w: &mut XmlWriter, party: &Party, wrapper: &str) -> Result<(), crate::core::ConvertError> {
    w.start_element(wrapper)?;
    w.start_element("cac:Party")?;

    if let Some(ea) = &party.electronic_address {
        let (scheme, value) = detect_scheme(&ea.scheme, &ea.value);
        w.text_element_with_attrs("cbc:EndpointID", value, &[("schemeID", scheme)])?;
    }

    if let Some(tn) = &party.trading_name {
        w.start_element("cac:PartyName")?;
        w.text_element("cbc:Name", tn)?;
        w.end_element("cac:PartyName")?;
    }

    // BG-5/BG-8 — UBL postal order: street, city, postal zone, country.
    w.start_element("cac:PostalAddress")?;
    w.text_element("cbc:StreetName", &party.address.street)?;
    w.text_element("cbc:CityName", &party.address.city)?;
    w.text_element("cbc:PostalZone", &party.address.postal_code)?;
    w.start_element("cac:Country")?;
    w.text_element("cbc:IdentificationCode", &party.address.country_code)?;
    w.end_element("cac:Country")?;
    w.end_element("cac:PostalAddress")?;

    if let Some(vat_id) = &party.vat_id {
        w.start_element("cac:PartyTaxScheme")?;
        w.text_element("cbc:CompanyID", vat_id)?;
        w.start_element("cac:TaxScheme")?;
        w.text_element("cbc:ID", "VAT")?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:PartyTaxScheme")?;
    }

    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    w.text_element("cbc:CompanyID", party.legal_identifier())?;
    w.end_element("cac:PartyLegalEntity")?;

    if let Some(contact) = &party.contact {
        w.start_element("cac:Contact")?;
        w.opt_text_element("cbc:Name", contact.name.as_deref())?;
        w.opt_text_element("cbc:Telephone", contact.phone.as_deref())?;
        w.opt_text_element("cbc:ElectronicMail", contact.email.as_deref())?;
        w.end_element("cac:Contact")?;
    }

    w.end_element("cac:Party")?;
    w.end_element(wrapper)?;
    Ok(())
}

fn write_allowance_charge(
    w: &mut XmlWriter,
    ac: &AllowanceCharge,
    currency: &str,
) -> Result<(), crate::core::ConvertError> {
    w.start_element("cac:AllowanceCharge")?;
    w.text_element("cbc:ChargeIndicator", if ac.is_charge { "true" } else { "false" })?;
    w.opt_text_element("cbc:AllowanceChargeReason", ac.reason.as_deref())?;
    if let Some(pct) = ac.percentage {
        w.text_element("cbc:MultiplierFactorNumeric", &format_decimal(pct))?;
    }
    w.amount_element("cbc:Amount", ac.amount, currency)?;
    if let Some(base) = ac.base_amount {
        w.amount_element("cbc:BaseAmount", base, currency)?;
    }
    let rate = ac.tax_rate.unwrap_or(Decimal::ZERO);
    w.start_element("cac:TaxCategory")?;
    w.text_element("cbc:ID", allowance_category(ac).code())?;
    w.text_element("cbc:Percent", &format_decimal(rate))?;
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", "VAT")?;
    w.end_element("cac:TaxScheme")?;
    w.end_element("cac:TaxCategory")?;
    w.end_element("cac:AllowanceCharge")?;
    Ok(())
}

fn write_tax_total(
    w: &mut XmlWriter,
    invoice: &Invoice,
    currency: &str,
) -> Result<(), crate::core::ConvertError> {
    w.start_element("cac:TaxTotal")?;
    w.amount_element("cbc:TaxAmount", invoice.totals.tax_total, currency)?;
    for group in breakdown::tax_breakdown(invoice) {
        w.start_element("cac:TaxSubtotal")?;
        w.amount_element("cbc:TaxableAmount", group.taxable_amount, currency)?;
        w.amount_element("cbc:TaxAmount", group.tax_amount, currency)?;
        w.start_element("cac:TaxCategory")?;
        w.text_element("cbc:ID", group.category.code())?;
        w.text_element("cbc:Percent", &format_decimal(group.rate))?;
        w.opt_text_element("cbc:TaxExemptionReason", group.exemption_reason)?;
        w.start_element("cac:TaxScheme")?;
        w.text_element("cbc:ID", "VAT")?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:TaxCategory")?;
        w.end_element("cac:TaxSubtotal")?;
    }
    w.end_element("cac:TaxTotal")?;
    Ok(())
}

fn write_monetary_total(
    w: &mut XmlWriter,
    invoice: &Invoice,
    currency: &str,
) -> Result<(), crate::core::ConvertError> {
    let line_sum = money::sum(invoice.lines.iter().map(|l| l.line_total));
    let allowances = money::sum(
        invoice
            .allowance_charges
            .iter()
            .filter(|ac| !ac.is_charge)
            .map(|ac| ac.amount),
    );
    let charges = money::sum(
        invoice
            .allowance_charges
            .iter()
            .filter(|ac| ac.is_charge)
            .map(|ac| ac.amount),
    );

    // BG-22 — mandated sub-element order.
    w.start_element("cac:LegalMonetaryTotal")?;
    w.amount_element("cbc:LineExtensionAmount", line_sum, currency)?;
    w.amount_element("cbc:TaxExclusiveAmount", invoice.totals.net_total, currency)?;
    w.amount_element("cbc:TaxInclusiveAmount", invoice.totals.gross_total, currency)?;
    if allowances > Decimal::ZERO {
        w.amount_element("cbc:AllowanceTotalAmount", allowances, currency)?;
    }
    if charges > Decimal::ZERO {
        w.amount_element("cbc:ChargeTotalAmount", charges, currency)?;
    }
    w.amount_element("cbc:PayableAmount", invoice.totals.gross_total, currency)?;
    w.end_element("cac:LegalMonetaryTotal")?;
    Ok(())
}

fn write_line(
    w: &mut XmlWriter,
    line: &LineItem,
    currency: &str,
    line_tag: &str,
    qty_tag: &str,
) -> Result<(), crate::core::ConvertError> {
    w.start_element(line_tag)?;
    w.text_element("cbc:ID", &line.id)?;
    w.quantity_element(qty_tag, line.quantity, &line.unit)?;
    w.amount_element("cbc:LineExtensionAmount", line.line_total, currency)?;

    w.start_element("cac:Item")?;
    w.opt_text_element("cbc:Description", line.description.as_deref())?;
    w.text_element("cbc:Name", &line.name)?;
    w.start_element("cac:ClassifiedTaxCategory")?;
    w.text_element("cbc:ID", line_category(line).code())?;
    w.text_element("cbc:Percent", &format_decimal(line.tax_rate))?;
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", "VAT")?;
    w.end_element("cac:TaxScheme")?;
    w.end_element("cac:ClassifiedTaxCategory")?;
    w.end_element("cac:Item")?;

    w.start_element("cac:Price")?;
    w.amount_element("cbc:PriceAmount", line.unit_price, currency)?;
    w.end_element("cac:Price")?;

    w.end_element(line_tag)?;
    Ok(())
}
