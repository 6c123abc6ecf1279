//! Format selection and document generation.
//!
//! [`Format`] is a closed enum dispatched by exhaustive match — adding a
//! standard is a compile-time-checked change, not a registry lookup.
//! Generated XML passes the security guard before it leaves the engine.

use crate::core::validation::{ValidationReport, validate_with_profile};
use crate::core::{ConvertError, Invoice};
use crate::guard::{self, GuardPolicy};

/// The supported target standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// German XRechnung over UBL 2.1.
    XRechnungUbl,
    /// German XRechnung over UN/CEFACT CII.
    XRechnungCii,
    /// Peppol BIS Billing 3.0 (UBL).
    PeppolBis,
    /// Italian FatturaPA (FPR12).
    FatturaPa,
    /// Polish KSeF (FA(2)).
    Ksef,
    /// Dutch NLCIUS (UBL).
    Nlcius,
    /// French/DACH Factur-X (CII, EN 16931 profile).
    FacturX,
    /// Romanian CIUS-RO (UBL).
    CiusRo,
}

impl Format {
    /// All supported formats, in a stable order.
    pub const ALL: [Format; 8] = [
        Format::XRechnungUbl,
        Format::XRechnungCii,
        Format::PeppolBis,
        Format::FatturaPa,
        Format::Ksef,
        Format::Nlcius,
        Format::FacturX,
        Format::CiusRo,
    ];

    /// File-name slug for this format.
    pub fn slug(&self) -> &'static str {
        match self {
            Format::XRechnungUbl => "xrechnung-ubl",
            Format::XRechnungCii => "xrechnung-cii",
            Format::PeppolBis => "peppol-bis",
            Format::FatturaPa => "fatturapa",
            Format::Ksef => "ksef",
            Format::Nlcius => "nlcius",
            Format::FacturX => "facturx",
            Format::CiusRo => "cius-ro",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// One generated document: the XML, its UTF-8 byte length, and the
/// suggested file name (`{number}_{format}.xml`).
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub xml: String,
    pub byte_len: usize,
    pub file_name: String,
}

/// Run the validation pipeline with the profile matching `format`.
pub fn validate_for(invoice: &Invoice, format: Format) -> ValidationReport {
    match format {
        Format::XRechnungUbl | Format::XRechnungCii => {
            validate_with_profile(invoice, crate::xrechnung::validate_xrechnung)
        }
        Format::PeppolBis => validate_with_profile(invoice, crate::peppol::validate_peppol),
        Format::FatturaPa => validate_with_profile(invoice, crate::fatturapa::validate_fatturapa),
        Format::Ksef => validate_with_profile(invoice, crate::ksef::validate_ksef),
        Format::Nlcius => validate_with_profile(invoice, crate::nlcius::validate_nlcius),
        Format::FacturX => validate_with_profile(invoice, crate::facturx::validate_facturx),
        Format::CiusRo => validate_with_profile(invoice, crate::ciusro::validate_ciusro),
    }
}

/// Generate the document for `format`.
///
/// The output is inspected by the security guard as a final defense
/// before it leaves the engine; a violation is a typed error, never
/// silently repaired.
pub fn generate(invoice: &Invoice, format: Format) -> Result<GeneratedDocument, ConvertError> {
    if invoice.number.trim().is_empty() {
        return Err(ConvertError::MissingField("number"));
    }

    let xml = match format {
        Format::XRechnungUbl => crate::xrechnung::to_ubl_xml(invoice)?,
        Format::XRechnungCii => crate::xrechnung::to_cii_xml(invoice)?,
        Format::PeppolBis => crate::peppol::to_ubl_xml(invoice)?,
        Format::FatturaPa => crate::fatturapa::to_xml(invoice)?,
        Format::Ksef => crate::ksef::to_xml(invoice)?,
        Format::Nlcius => crate::nlcius::to_ubl_xml(invoice)?,
        Format::FacturX => crate::facturx::to_cii_xml(invoice)?,
        Format::CiusRo => crate::ciusro::to_ubl_xml(invoice)?,
    };

    guard::inspect_xml(&xml, &GuardPolicy::default())?;

    let byte_len = xml.len();
    let file_name = format!("{}_{}.xml", invoice.number, format.slug());
    Ok(GeneratedDocument {
        xml,
        byte_len,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        InvoiceBuilder::new("INV-42", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
            .seller(
                PartyBuilder::new("Seller GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
                    .vat_id("DE123456789")
                    .build(),
            )
            .buyer(
                PartyBuilder::new("Buyer AG", "Marienplatz 1", "München", "80331", "DE").build(),
            )
            .add_line(
                LineItemBuilder::new("1", "Service", dec!(1), "C62", dec!(100))
                    .tax_rate(dec!(19))
                    .build(),
            )
            .build()
    }

    #[test]
    fn every_format_generates_and_passes_the_guard() {
        let inv = invoice();
        for format in Format::ALL {
            let doc = generate(&inv, format).unwrap();
            assert!(doc.xml.starts_with("<?xml"), "{format}: missing declaration");
            assert_eq!(doc.byte_len, doc.xml.len());
            assert_eq!(doc.file_name, format!("INV-42_{}.xml", format.slug()));
        }
    }

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<_> = Format::ALL.iter().map(|f| f.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), Format::ALL.len());
    }

    #[test]
    fn empty_number_is_a_structural_error() {
        let mut inv = invoice();
        inv.number = "".into();
        assert!(matches!(
            generate(&inv, Format::XRechnungUbl),
            Err(ConvertError::MissingField("number"))
        ));
    }

    #[test]
    fn generation_is_deterministic() {
        let inv = invoice();
        for format in Format::ALL {
            let a = generate(&inv, format).unwrap();
            let b = generate(&inv, format).unwrap();
            assert_eq!(a.xml, b.xml, "{format}: output must be byte-identical");
        }
    }
}
