//! KSeF — the Polish national e-invoicing format (FA(2) schema).
//!
//! Like FatturaPA this is a standalone schema, not an EN 16931 syntax
//! binding. The schema asks for a generation timestamp
//! (`DataWytworzeniaFa`); determinism forbids wall-clock reads, so it is
//! pinned to the invoice issue date at midnight UTC.

mod validate;

pub use validate::{party_nip, validate_ksef};

use crate::core::types::*;
use crate::syntax::{XmlResult, XmlWriter, format_decimal};

/// KSeF FA(2) namespace.
pub const KSEF_NS: &str = "http://crd.gov.pl/wzor/2023/06/29/12648/";

const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Generate a KSeF FA(2) document.
pub fn to_xml(invoice: &Invoice) -> XmlResult {
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs("Faktura", &[("xmlns", KSEF_NS), ("xmlns:xsi", XSI_NS)])?;

    w.start_element("Naglowek")?;
    w.text_element_with_attrs(
        "KodFormularza",
        "FA",
        &[("kodSystemowy", "FA (2)"), ("wersjaSchemy", "1-0E")],
    )?;
    w.text_element("WariantFormularza", "2")?;
    w.text_element(
        "DataWytworzeniaFa",
        &format!("{}T00:00:00Z", invoice.issue_date),
    )?;
    w.end_element("Naglowek")?;

    write_subject(&mut w, &invoice.seller, "Podmiot1")?;
    write_subject(&mut w, &invoice.buyer, "Podmiot2")?;

    w.start_element("Fa")?;
    w.text_element("KodWaluty", &invoice.currency_code)?;
    w.text_element("P_1", &invoice.issue_date.to_string())?;
    w.text_element("P_2", &invoice.number)?;
    w.text_element("P_13_1", &format_decimal(invoice.totals.net_total))?;
    w.text_element("P_14_1", &format_decimal(invoice.totals.tax_total))?;
    w.text_element("P_15", &format_decimal(invoice.totals.gross_total))?;

    let rodzaj = match invoice.type_code {
        InvoiceTypeCode::CreditNote | InvoiceTypeCode::Corrected => "KOR",
        _ => "VAT",
    };
    w.text_element("RodzajFaktury", rodzaj)?;
    if let Some(pi) = &invoice.preceding_invoice {
        w.start_element("DaneFaKorygowanej")?;
        if let Some(d) = &pi.issue_date {
            w.text_element("DataWystFaKorygowanej", &d.to_string())?;
        }
        w.text_element("NrFaKorygowanej", &pi.number)?;
        w.end_element("DaneFaKorygowanej")?;
    }

    for (i, line) in invoice.lines.iter().enumerate() {
        w.start_element("FaWiersz")?;
        w.text_element("NrWierszaFa", &(i + 1).to_string())?;
        w.text_element("P_7", &line.name)?;
        w.text_element("P_8A", &line.unit)?;
        w.text_element("P_8B", &format_decimal(line.quantity))?;
        w.text_element("P_9A", &format_decimal(line.unit_price))?;
        w.text_element("P_11", &format_decimal(line.line_total))?;
        w.text_element("P_12", &rate_token(line))?;
        w.end_element("FaWiersz")?;
    }

    w.end_element("Fa")?;
    w.end_element("Faktura")?;
    w.into_string()
}

/// FA(2) rate token: the integer percentage, or "zw" for exempt supplies.
fn rate_token(line: &LineItem) -> String {
    use crate::core::breakdown::line_category;
    if line.tax_rate.is_zero() && line_category(line) != TaxCategory::ZeroRated {
        "zw".to_string()
    } else {
        format_decimal(line.tax_rate)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn write_subject(
    w: &mut XmlWriter,
    party: &Party,
    wrapper: &str,
) -> Result<(), crate::core::ConvertError> {
    w.start_element(wrapper)?;

    w.start_element("DaneIdentyfikacyjne")?;
    match party_nip(party) {
        Some(nip) => {
            w.text_element("NIP", &nip)?;
        }
        None => {
            w.opt_text_element("NrID", party.vat_id.as_deref())?;
        }
    }
    w.text_element("Nazwa", &party.name)?;
    w.end_element("DaneIdentyfikacyjne")?;

    w.start_element("Adres")?;
    w.text_element("KodKraju", &party.address.country_code)?;
    w.text_element("AdresL1", &party.address.street)?;
    w.text_element(
        "AdresL2",
        &format!("{} {}", party.address.postal_code, party.address.city),
    )?;
    w.end_element("Adres")?;

    w.end_element(wrapper)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn polish_invoice() -> Invoice {
        InvoiceBuilder::new("FV-2026-03", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
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
                LineItemBuilder::new("1", "Usługa IT", dec!(10), "HUR", dec!(200))
                    .tax_rate(dec!(23))
                    .build(),
            )
            .build()
    }

    #[test]
    fn emits_fa2_header() {
        let xml = to_xml(&polish_invoice()).unwrap();
        assert!(xml.contains(KSEF_NS));
        assert!(xml.contains("kodSystemowy=\"FA (2)\""));
        assert!(xml.contains("<WariantFormularza>2</WariantFormularza>"));
    }

    #[test]
    fn generation_timestamp_derives_from_issue_date() {
        let xml = to_xml(&polish_invoice()).unwrap();
        assert!(xml.contains("<DataWytworzeniaFa>2026-03-10T00:00:00Z</DataWytworzeniaFa>"));
        // Deterministic: two runs are byte-identical.
        assert_eq!(xml, to_xml(&polish_invoice()).unwrap());
    }

    #[test]
    fn subjects_carry_nip() {
        let xml = to_xml(&polish_invoice()).unwrap();
        assert!(xml.contains("<NIP>5260250995</NIP>"));
        assert!(xml.contains("<NIP>6762334567</NIP>"));
    }

    #[test]
    fn totals_and_lines() {
        let xml = to_xml(&polish_invoice()).unwrap();
        assert!(xml.contains("<P_13_1>2000.00</P_13_1>"));
        assert!(xml.contains("<P_14_1>460.00</P_14_1>"));
        assert!(xml.contains("<P_15>2460.00</P_15>"));
        assert!(xml.contains("<P_12>23</P_12>"));
    }

    #[test]
    fn credit_note_is_kor() {
        let mut inv = polish_invoice();
        inv.type_code = InvoiceTypeCode::CreditNote;
        inv.preceding_invoice = Some(PrecedingInvoice {
            number: "FV-2026-01".into(),
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 5),
        });
        let xml = to_xml(&inv).unwrap();
        assert!(xml.contains("<RodzajFaktury>KOR</RodzajFaktury>"));
        assert!(xml.contains("<NrFaKorygowanej>FV-2026-01</NrFaKorygowanej>"));
    }
}
