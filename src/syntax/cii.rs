//! UN/CEFACT Cross Industry Invoice writer, shared by XRechnung-CII and
//! Factur-X.
//!
//! CII dates use qualifier format 102 (`YYYYMMDD`). The postal address
//! block emits its sub-elements in the mandated order — postcode, street
//! line, city, country — which downstream validators enforce.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{XmlResult, XmlWriter, cii_ns, format_decimal};
use crate::core::breakdown::{self, allowance_category, line_category};
use crate::core::money;
use crate::core::types::*;
use crate::peppol::eas::detect_scheme;

/// Identifiers distinguishing one CII-based standard from another.
pub struct CiiGuideline {
    /// BT-24: Guideline / specification identifier.
    pub guideline_id: &'static str,
    /// BT-23: Business process, when the standard mandates one.
    pub business_process_id: Option<&'static str>,
}

/// Generate a CrossIndustryInvoice document.
pub fn write_invoice(invoice: &Invoice, guideline: &CiiGuideline) -> XmlResult {
    let currency = &invoice.currency_code;
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", cii_ns::RSM),
            ("xmlns:ram", cii_ns::RAM),
            ("xmlns:qdt", cii_ns::QDT),
            ("xmlns:udt", cii_ns::UDT),
        ],
    )?;

    // --- ExchangedDocumentContext ---
    w.start_element("rsm:ExchangedDocumentContext")?;
    if let Some(process) = guideline.business_process_id {
        w.start_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
        w.text_element("ram:ID", process)?;
        w.end_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
    }
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", guideline.guideline_id)?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:ExchangedDocumentContext")?;

    // --- ExchangedDocument ---
    w.start_element("rsm:ExchangedDocument")?;
    w.text_element("ram:ID", &invoice.number)?;
    w.text_element("ram:TypeCode", &invoice.type_code.code().to_string())?;
    write_date(&mut w, "ram:IssueDateTime", &invoice.issue_date)?;
    for note in &invoice.notes {
        if !note.trim().is_empty() {
            w.start_element("ram:IncludedNote")?;
            w.text_element("ram:Content", note)?;
            w.end_element("ram:IncludedNote")?;
        }
    }
    w.end_element("rsm:ExchangedDocument")?;

    // --- SupplyChainTradeTransaction ---
    w.start_element("rsm:SupplyChainTradeTransaction")?;

    for line in &invoice.lines {
        write_line(&mut w, line)?;
    }

    // --- ApplicableHeaderTradeAgreement ---
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    w.opt_text_element("ram:BuyerReference", invoice.buyer_reference.as_deref())?;
    write_party(&mut w, &invoice.seller, "ram:SellerTradeParty")?;
    write_party(&mut w, &invoice.buyer, "ram:BuyerTradeParty")?;
    if let Some(or) = &invoice.order_reference {
        w.start_element("ram:BuyerOrderReferencedDocument")?;
        w.text_element("ram:IssuerAssignedID", or)?;
        w.end_element("ram:BuyerOrderReferencedDocument")?;
    }
    if let Some(pi) = &invoice.preceding_invoice {
        w.start_element("ram:InvoiceReferencedDocument")?;
        w.text_element("ram:IssuerAssignedID", &pi.number)?;
        if let Some(d) = &pi.issue_date {
            write_formatted_date(&mut w, "ram:FormattedIssueDateTime", d)?;
        }
        w.end_element("ram:InvoiceReferencedDocument")?;
    }
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;

    // --- ApplicableHeaderTradeDelivery ---
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;

    // --- ApplicableHeaderTradeSettlement ---
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    if let Some(payment) = &invoice.payment {
        w.opt_text_element("ram:PaymentReference", payment.remittance_info.as_deref())?;
    }
    w.text_element("ram:InvoiceCurrencyCode", currency)?;

    if let Some(payment) = &invoice.payment {
        w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
        w.text_element("ram:TypeCode", &payment.means_code.code().to_string())?;
        if let Some(ct) = &payment.credit_transfer {
            w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
            w.text_element("ram:IBANID", &ct.iban)?;
            w.opt_text_element("ram:AccountName", ct.account_name.as_deref())?;
            w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
            if let Some(bic) = &ct.bic {
                w.start_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
                w.text_element("ram:BICID", bic)?;
                w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
            }
        }
        w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }

    for group in breakdown::tax_breakdown(invoice) {
        w.start_element("ram:ApplicableTradeTax")?;
        w.text_element("ram:CalculatedAmount", &format_decimal(group.tax_amount))?;
        w.text_element("ram:TypeCode", "VAT")?;
        w.opt_text_element("ram:ExemptionReason", group.exemption_reason)?;
        w.text_element("ram:BasisAmount", &format_decimal(group.taxable_amount))?;
        w.text_element("ram:CategoryCode", group.category.code())?;
        w.text_element("ram:RateApplicablePercent", &format_decimal(group.rate))?;
        w.end_element("ram:ApplicableTradeTax")?;
    }

    if let Some(period) = &invoice.billing_period {
        w.start_element("ram:BillingSpecifiedPeriod")?;
        write_date(&mut w, "ram:StartDateTime", &period.start)?;
        write_date(&mut w, "ram:EndDateTime", &period.end)?;
        w.end_element("ram:BillingSpecifiedPeriod")?;
    }

    for ac in &invoice.allowance_charges {
        write_allowance_charge(&mut w, ac)?;
    }

    if invoice.payment_terms.is_some() || invoice.due_date.is_some() {
        w.start_element("ram:SpecifiedTradePaymentTerms")?;
        w.opt_text_element("ram:Description", invoice.payment_terms.as_deref())?;
        if let Some(due) = &invoice.due_date {
            w.start_element("ram:DueDateDateTime")?;
            w.text_element_with_attrs(
                "udt:DateTimeString",
                &due.format("%Y%m%d").to_string(),
                &[("format", "102")],
            )?;
            w.end_element("ram:DueDateDateTime")?;
        }
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }

    write_summation(&mut w, invoice, currency)?;

    w.end_element("ram:ApplicableHeaderTradeSettlement")?;
    w.end_element("rsm:SupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryInvoice")?;

    w.into_string()
}

fn write_date(
    w: &mut XmlWriter,
    name: &str,
    date: &NaiveDate,
) -> Result<(), crate::core::ConvertError> {
    w.start_element(name)?;
    w.text_element_with_attrs(
        "udt:DateTimeString",
        &date.format("%Y%m%d").to_string(),
        &[("format", "102")],
    )?;
    w.end_element(name)?;
    Ok(())
}

fn write_formatted_date(
    w: &mut XmlWriter,
    name: &str,
    date: &NaiveDate,
) -> Result<(), crate::core::ConvertError> {
    w.start_element(name)?;
    w.text_element_with_attrs(
        "qdt:DateTimeString",
        &date.format("%Y%m%d").to_string(),
        &[("format", "102")],
    )?;
    w.end_element(name)?;
    Ok(())
}

fn write_party(
    w: &mut XmlWriter,
    party: &Party,
    wrapper: &str,
) -> Result<(), crate::core::ConvertError> {
    w.start_element(wrapper)?;
    w.text_element("ram:Name", &party.name)?;

    if let Some(contact) = &party.contact {
        w.start_element("ram:DefinedTradeContact")?;
        w.opt_text_element("ram:PersonName", contact.name.as_deref())?;
        if let Some(phone) = &contact.phone {
            w.start_element("ram:TelephoneUniversalCommunication")?;
            w.text_element("ram:CompleteNumber", phone)?;
            w.end_element("ram:TelephoneUniversalCommunication")?;
        }
        if let Some(email) = &contact.email {
            w.start_element("ram:EmailURIUniversalCommunication")?;
            w.text_element("ram:URIID", email)?;
            w.end_element("ram:EmailURIUniversalCommunication")?;
        }
        w.end_element("ram:DefinedTradeContact")?;
    }

    // Mandated order: postcode, street line, city, country.
    w.start_element("ram:PostalTradeAddress")?;
    w.text_element("ram:PostcodeCode", &party.address.postal_code)?;
    w.text_element("ram:LineOne", &party.address.street)?;
    w.text_element("ram:CityName", &party.address.city)?;
    w.text_element("ram:CountryID", &party.address.country_code)?;
    w.end_element("ram:PostalTradeAddress")?;

    if let Some(ea) = &party.electronic_address {
        let (scheme, value) = detect_scheme(&ea.scheme, &ea.value);
        w.start_element("ram:URIUniversalCommunication")?;
        w.text_element_with_attrs("ram:URIID", value, &[("schemeID", scheme)])?;
        w.end_element("ram:URIUniversalCommunication")?;
    }

    if let Some(vat_id) = &party.vat_id {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs("ram:ID", vat_id, &[("schemeID", "VA")])?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    } else if let Some(tax_number) = &party.tax_number {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs("ram:ID", tax_number, &[("schemeID", "FC")])?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }

    w.end_element(wrapper)?;
    Ok(())
}

fn write_allowance_charge(
    w: &mut XmlWriter,
    ac: &AllowanceCharge,
) -> Result<(), crate::core::ConvertError> {
    w.start_element("ram:SpecifiedTradeAllowanceCharge")?;
    w.start_element("ram:ChargeIndicator")?;
    w.text_element("udt:Indicator", if ac.is_charge { "true" } else { "false" })?;
    w.end_element("ram:ChargeIndicator")?;
    if let Some(pct) = ac.percentage {
        w.text_element("ram:CalculationPercent", &format_decimal(pct))?;
    }
    if let Some(base) = ac.base_amount {
        w.text_element("ram:BasisAmount", &format_decimal(base))?;
    }
    w.text_element("ram:ActualAmount", &format_decimal(ac.amount))?;
    w.opt_text_element("ram:Reason", ac.reason.as_deref())?;
    w.start_element("ram:CategoryTradeTax")?;
    w.text_element("ram:TypeCode", "VAT")?;
    w.text_element("ram:CategoryCode", allowance_category(ac).code())?;
    w.text_element(
        "ram:RateApplicablePercent",
        &format_decimal(ac.tax_rate.unwrap_or(Decimal::ZERO)),
    )?;
    w.end_element("ram:CategoryTradeTax")?;
    w.end_element("ram:SpecifiedTradeAllowanceCharge")?;
    Ok(())
}

fn write_summation(
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
    w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.text_element("ram:LineTotalAmount", &format_decimal(line_sum))?;
    if charges > Decimal::ZERO {
        w.text_element("ram:ChargeTotalAmount", &format_decimal(charges))?;
    }
    if allowances > Decimal::ZERO {
        w.text_element("ram:AllowanceTotalAmount", &format_decimal(allowances))?;
    }
    w.text_element("ram:TaxBasisTotalAmount", &format_decimal(invoice.totals.net_total))?;
    w.text_element_with_attrs(
        "ram:TaxTotalAmount",
        &format_decimal(invoice.totals.tax_total),
        &[("currencyID", currency)],
    )?;
    w.text_element("ram:GrandTotalAmount", &format_decimal(invoice.totals.gross_total))?;
    w.text_element("ram:DuePayableAmount", &format_decimal(invoice.totals.gross_total))?;
    w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    Ok(())
}

fn write_line(w: &mut XmlWriter, line: &LineItem) -> Result<(), crate::core::ConvertError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.id)?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    w.text_element("ram:Name", &line.name)?;
    w.opt_text_element("ram:Description", line.description.as_deref())?;
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.text_element("ram:ChargeAmount", &format_decimal(line.unit_price))?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.text_element_with_attrs(
        "ram:BilledQuantity",
        &format_decimal(line.quantity),
        &[("unitCode", &line.unit)],
    )?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    w.start_element("ram:ApplicableTradeTax")?;
    w.text_element("ram:TypeCode", "VAT")?;
    w.text_element("ram:CategoryCode", line_category(line).code())?;
    w.text_element("ram:RateApplicablePercent", &format_decimal(line.tax_rate))?;
    w.end_element("ram:ApplicableTradeTax")?;
    w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.text_element("ram:LineTotalAmount", &format_decimal(line.line_total))?;
    w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
