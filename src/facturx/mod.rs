//! Factur-X / ZUGFeRD — the French/DACH CII profile (EN 16931 level).
//!
//! This module emits the CII XML payload only; embedding it into a
//! PDF/A-3 container is a packaging concern outside this engine.

mod validate;

pub use validate::validate_facturx;

use crate::core::Invoice;
use crate::syntax::XmlResult;
use crate::syntax::cii::{CiiGuideline, write_invoice};

/// Factur-X EN 16931 profile guideline identifier (BT-24).
pub const FACTURX_GUIDELINE_ID: &str = "urn:cen.eu:en16931:2017";

/// Generate a Factur-X (EN 16931 profile) CII document.
pub fn to_cii_xml(invoice: &Invoice) -> XmlResult {
    write_invoice(
        invoice,
        &CiiGuideline {
            guideline_id: FACTURX_GUIDELINE_ID,
            business_process_id: None,
        },
    )
}
