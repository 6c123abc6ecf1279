//! XRechnung 3.0 — the German CIUS of EN 16931, expressible in both
//! base syntaxes.
//!
//! - **UBL 2.1** via [`to_ubl_xml`]
//! - **CII** (UN/CEFACT Cross Industry Invoice) via [`to_cii_xml`]

mod validate;

pub use validate::validate_xrechnung;

use crate::core::Invoice;
use crate::syntax::cii::{CiiGuideline, write_invoice as write_cii};
use crate::syntax::ubl::{UblProfile, write_invoice as write_ubl};
use crate::syntax::XmlResult;

/// XRechnung 3.0 specification identifier (BT-24).
pub const XRECHNUNG_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0";

/// Business process identifier used with XRechnung (BT-23).
pub const XRECHNUNG_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// Generate XRechnung-compliant UBL 2.1 XML.
pub fn to_ubl_xml(invoice: &Invoice) -> XmlResult {
    write_ubl(
        invoice,
        &UblProfile {
            customization_id: XRECHNUNG_CUSTOMIZATION_ID,
            profile_id: XRECHNUNG_PROFILE_ID,
        },
    )
}

/// Generate XRechnung-compliant CII XML.
pub fn to_cii_xml(invoice: &Invoice) -> XmlResult {
    write_cii(
        invoice,
        &CiiGuideline {
            guideline_id: XRECHNUNG_CUSTOMIZATION_ID,
            business_process_id: Some(XRECHNUNG_PROFILE_ID),
        },
    )
}
