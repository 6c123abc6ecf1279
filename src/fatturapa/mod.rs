//! FatturaPA — the Italian national format (FPR12).
//!
//! Unlike the other standards, FatturaPA is not an EN 16931 syntax
//! binding: it has its own schema rooted at `FatturaElettronica`, with
//! transmission routing (CodiceDestinatario) baked into the header.

mod validate;

pub use validate::validate_fatturapa;

use crate::core::breakdown::{self, line_category};
use crate::core::types::*;
use crate::syntax::{XmlResult, XmlWriter, format_decimal};

/// FatturaPA v1.2 namespace.
pub const FATTURAPA_NS: &str = "http://ivaservizi.agenziaentrate.gov.it/docs/xsd/fatture/v1.2";

const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Routing code used when no recipient code is known (PEC delivery).
const DEFAULT_RECIPIENT_CODE: &str = "0000000";

/// Generate a FatturaPA (FPR12) document.
pub fn to_xml(invoice: &Invoice) -> XmlResult {
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "p:FatturaElettronica",
        &[
            ("versione", "FPR12"),
            ("xmlns:p", FATTURAPA_NS),
            ("xmlns:ds", XMLDSIG_NS),
            ("xmlns:xsi", XSI_NS),
        ],
    )?;

    write_header(&mut w, invoice)?;
    write_body(&mut w, invoice)?;

    w.end_element("p:FatturaElettronica")?;
    w.into_string()
}

/// Split a VAT identifier into country prefix and national code.
/// "IT01234567890" → ("IT", "01234567890").
fn split_vat_id(vat_id: &str) -> (&str, &str) {
    let bytes = vat_id.as_bytes();
    if bytes.len() > 2 && bytes[..2].iter().all(|b| b.is_ascii_uppercase()) {
        vat_id.split_at(2)
    } else {
        ("IT", vat_id)
    }
}

/// The 7-character recipient routing code, taken from the buyer's
/// electronic address. An email endpoint means PEC delivery and the
/// zero code.
fn recipient_code(buyer: &Party) -> &str {
    match &buyer.electronic_address {
        Some(ea) if !ea.value.contains('@') && ea.value.len() == 7 => &ea.value,
        _ => DEFAULT_RECIPIENT_CODE,
    }
}

/// UNTDID 1001 → TipoDocumento.
fn tipo_documento(type_code: InvoiceTypeCode) -> &'static str {
    match type_code {
        InvoiceTypeCode::Invoice | InvoiceTypeCode::Corrected => "TD01",
        InvoiceTypeCode::CreditNote => "TD04",
        InvoiceTypeCode::SelfBilled => "TD16",
    }
}

/// Natura code for zero-tax categories (mandatory when AliquotaIVA is 0).
fn natura_code(category: TaxCategory) -> Option<&'static str> {
    match category {
        TaxCategory::ZeroRated | TaxCategory::NotSubjectToVat => Some("N2.2"),
        TaxCategory::Exempt => Some("N4"),
        TaxCategory::ReverseCharge => Some("N6.9"),
        TaxCategory::IntraCommunitySupply => Some("N3.2"),
        TaxCategory::Export => Some("N3.1"),
        _ => None,
    }
}

fn write_header(w: &mut XmlWriter, invoice: &Invoice) -> Result<(), crate::core::ConvertError> {
    w.start_element("FatturaElettronicaHeader")?;

    // Transmission block — who sends, where it is routed.
    let (seller_country, seller_code) = invoice
        .seller
        .vat_id
        .as_deref()
        .map(split_vat_id)
        .unwrap_or(("IT", invoice.seller.legal_identifier()));

    w.start_element("DatiTrasmissione")?;
    w.start_element("IdTrasmittente")?;
    w.text_element("IdPaese", seller_country)?;
    w.text_element("IdCodice", seller_code)?;
    w.end_element("IdTrasmittente")?;
    w.text_element("ProgressivoInvio", &invoice.number)?;
    w.text_element("FormatoTrasmissione", "FPR12")?;
    w.text_element("CodiceDestinatario", recipient_code(&invoice.buyer))?;
    w.end_element("DatiTrasmissione")?;

    write_party(w, &invoice.seller, "CedentePrestatore", true)?;
    write_party(w, &invoice.buyer, "CessionarioCommittente", false)?;

    w.end_element("FatturaElettronicaHeader")?;
    Ok(())
}

fn write_party(
    w: &mut XmlWriter,
    party: &Party,
    wrapper: &str,
    is_seller: bool,
) -> Result<(), crate::core::ConvertError> {
    w.start_element(wrapper)?;
    w.start_element("DatiAnagrafici")?;

    if let Some(vat_id) = &party.vat_id {
        let (country, code) = split_vat_id(vat_id);
        w.start_element("IdFiscaleIVA")?;
        w.text_element("IdPaese", country)?;
        w.text_element("IdCodice", code)?;
        w.end_element("IdFiscaleIVA")?;
    } else if let Some(tax_number) = &party.tax_number {
        w.text_element("CodiceFiscale", tax_number)?;
    }

    w.start_element("Anagrafica")?;
    w.text_element("Denominazione", &party.name)?;
    w.end_element("Anagrafica")?;

    if is_seller {
        w.text_element("RegimeFiscale", "RF01")?;
    }
    w.end_element("DatiAnagrafici")?;

    w.start_element("Sede")?;
    w.text_element("Indirizzo", &party.address.street)?;
    w.text_element("CAP", &party.address.postal_code)?;
    w.text_element("Comune", &party.address.city)?;
    w.text_element("Nazione", &party.address.country_code)?;
    w.end_element("Sede")?;

    w.end_element(wrapper)?;
    Ok(())
}

fn write_body(w: &mut XmlWriter, invoice: &Invoice) -> Result<(), crate::core::ConvertError> {
    w.start_element("FatturaElettronicaBody")?;

    w.start_element("DatiGenerali")?;
    w.start_element("DatiGeneraliDocumento")?;
    w.text_element("TipoDocumento", tipo_documento(invoice.type_code))?;
    w.text_element("Divisa", &invoice.currency_code)?;
    w.text_element("Data", &invoice.issue_date.to_string())?;
    w.text_element("Numero", &invoice.number)?;
    w.text_element(
        "ImportoTotaleDocumento",
        &format_decimal(invoice.totals.gross_total),
    )?;
    w.end_element("DatiGeneraliDocumento")?;
    if let Some(pi) = &invoice.preceding_invoice {
        w.start_element("DatiFattureCollegate")?;
        w.text_element("IdDocumento", &pi.number)?;
        if let Some(d) = &pi.issue_date {
            w.text_element("Data", &d.to_string())?;
        }
        w.end_element("DatiFattureCollegate")?;
    }
    w.end_element("DatiGenerali")?;

    w.start_element("DatiBeniServizi")?;
    for (i, line) in invoice.lines.iter().enumerate() {
        w.start_element("DettaglioLinee")?;
        w.text_element("NumeroLinea", &(i + 1).to_string())?;
        w.text_element("Descrizione", &line.name)?;
        w.text_element("Quantita", &format_decimal(line.quantity))?;
        w.text_element("PrezzoUnitario", &format_decimal(line.unit_price))?;
        w.text_element("PrezzoTotale", &format_decimal(line.line_total))?;
        w.text_element("AliquotaIVA", &format_decimal(line.tax_rate))?;
        if line.tax_rate.is_zero() {
            w.opt_text_element("Natura", natura_code(line_category(line)))?;
        }
        w.end_element("DettaglioLinee")?;
    }

    for group in breakdown::tax_breakdown(invoice) {
        w.start_element("DatiRiepilogo")?;
        w.text_element("AliquotaIVA", &format_decimal(group.rate))?;
        if group.rate.is_zero() {
            w.opt_text_element("Natura", natura_code(group.category))?;
        }
        w.text_element("ImponibileImporto", &format_decimal(group.taxable_amount))?;
        w.text_element("Imposta", &format_decimal(group.tax_amount))?;
        w.text_element("EsigibilitaIVA", "I")?;
        w.end_element("DatiRiepilogo")?;
    }
    w.end_element("DatiBeniServizi")?;

    if let Some(payment) = &invoice.payment {
        w.start_element("DatiPagamento")?;
        w.text_element("CondizioniPagamento", "TP02")?;
        w.start_element("DettaglioPagamento")?;
        w.text_element("ModalitaPagamento", modalita_pagamento(payment.means_code))?;
        if let Some(due) = &invoice.due_date {
            w.text_element("DataScadenzaPagamento", &due.to_string())?;
        }
        w.text_element(
            "ImportoPagamento",
            &format_decimal(invoice.totals.gross_total),
        )?;
        if let Some(ct) = &payment.credit_transfer {
            w.text_element("IBAN", &ct.iban)?;
        }
        w.end_element("DettaglioPagamento")?;
        w.end_element("DatiPagamento")?;
    }

    w.end_element("FatturaElettronicaBody")?;
    Ok(())
}

/// UNTDID 4461 → ModalitaPagamento.
fn modalita_pagamento(code: PaymentMeansCode) -> &'static str {
    match code {
        PaymentMeansCode::Cash => "MP01",
        PaymentMeansCode::BankCard => "MP08",
        PaymentMeansCode::DirectDebit | PaymentMeansCode::SepaDirectDebit => "MP10",
        _ => "MP05",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn italian_invoice() -> Invoice {
        InvoiceBuilder::new("IT-2026-7", NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
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
                LineItemBuilder::new("1", "Consulenza", dec!(2), "HUR", dec!(500))
                    .tax_rate(dec!(22))
                    .build(),
            )
            .build()
    }

    #[test]
    fn emits_transmission_routing() {
        let xml = to_xml(&italian_invoice()).unwrap();
        assert!(xml.contains("<CodiceDestinatario>ABC1234</CodiceDestinatario>"));
        assert!(xml.contains("<FormatoTrasmissione>FPR12</FormatoTrasmissione>"));
        assert!(xml.contains("<IdPaese>IT</IdPaese>"));
        assert!(xml.contains("<IdCodice>01234567890</IdCodice>"));
    }

    #[test]
    fn email_endpoint_falls_back_to_zero_code() {
        let mut inv = italian_invoice();
        inv.buyer.electronic_address = Some(ElectronicAddress {
            scheme: "EM".into(),
            value: "pec@cliente.it".into(),
        });
        let xml = to_xml(&inv).unwrap();
        assert!(xml.contains("<CodiceDestinatario>0000000</CodiceDestinatario>"));
    }

    #[test]
    fn riepilogo_per_rate() {
        let xml = to_xml(&italian_invoice()).unwrap();
        assert!(xml.contains("<ImponibileImporto>1000.00</ImponibileImporto>"));
        assert!(xml.contains("<Imposta>220.00</Imposta>"));
        assert!(xml.contains("<AliquotaIVA>22.00</AliquotaIVA>"));
    }

    #[test]
    fn credit_note_maps_to_td04() {
        let mut inv = italian_invoice();
        inv.type_code = InvoiceTypeCode::CreditNote;
        inv.preceding_invoice = Some(PrecedingInvoice {
            number: "IT-2026-1".into(),
            issue_date: None,
        });
        let xml = to_xml(&inv).unwrap();
        assert!(xml.contains("<TipoDocumento>TD04</TipoDocumento>"));
        assert!(xml.contains("<IdDocumento>IT-2026-1</IdDocumento>"));
    }
}
