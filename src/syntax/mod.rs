//! Shared XML infrastructure for the two base syntaxes.
//!
//! Every supported standard emits either OASIS UBL 2.1 or UN/CEFACT CII;
//! the writers here are parameterized by the standard's customization /
//! guideline identifiers. Element ordering inside the writers is a
//! correctness contract: downstream government validators reject
//! structurally valid but misordered XML.

pub mod cii;
pub mod ubl;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::ConvertError;

pub type XmlResult = Result<String, ConvertError>;

/// UBL 2.1 namespace URIs.
pub mod ubl_ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// CII namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

fn xml_io(e: std::io::Error) -> ConvertError {
    ConvertError::Xml(format!("write error: {e}"))
}

/// Event-based XML writer: emits the declaration up front, indents with
/// two spaces, escapes text on write. Optional elements are the caller's
/// responsibility — an empty optional must be omitted entirely, never
/// emitted empty.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, ConvertError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, ConvertError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| ConvertError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, ConvertError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ConvertError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, ConvertError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, ConvertError> {
        let clean = sanitize_text(text);
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(&clean)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ConvertError> {
        let clean = sanitize_text(text);
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(&clean)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a text element only when the value is non-empty.
    pub fn opt_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, ConvertError> {
        match text {
            Some(t) if !t.trim().is_empty() => self.text_element(name, t),
            _ => Ok(self),
        }
    }

    /// Amount with currencyID attribute, always 2 decimal places.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, ConvertError> {
        self.text_element_with_attrs(name, &format_decimal(amount), &[("currencyID", currency)])
    }

    /// Quantity with unitCode attribute.
    pub fn quantity_element(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
    ) -> Result<&mut Self, ConvertError> {
        self.text_element_with_attrs(name, &format_decimal(qty), &[("unitCode", unit)])
    }
}

/// Format a Decimal for XML — at least 2 decimal places, trailing zeros
/// beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    match s.find('.') {
        Some(dot) => {
            let decimals = s.len() - dot - 1;
            if decimals < 2 {
                format!("{s}{}", "0".repeat(2 - decimals))
            } else {
                s
            }
        }
        None => format!("{s}.00"),
    }
}

/// Strip characters that are illegal in XML 1.0 text. The writer escapes
/// the five metacharacters itself; control characters other than tab,
/// newline and carriage return cannot be represented at all and are
/// removed.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || !c.is_control())
        .collect()
}
