//! Peppol BIS Billing 3.0.
//!
//! A CIUS of EN 16931 over the UBL 2.1 syntax — the shared UBL writer
//! with the Peppol customization identifier and stricter endpoint rules.

pub mod eas;
mod validate;

pub use eas::{EasScheme, detect_scheme, eas_scheme_for_country};
pub use validate::validate_peppol;

use crate::core::Invoice;
use crate::syntax::XmlResult;
use crate::syntax::ubl::{UblProfile, write_invoice};

/// Peppol BIS Billing 3.0 customization identifier (BT-24).
pub const PEPPOL_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0";

/// Peppol BIS Billing 3.0 profile identifier (BT-23).
pub const PEPPOL_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// Generate a Peppol BIS 3.0 compliant UBL invoice.
pub fn to_ubl_xml(invoice: &Invoice) -> XmlResult {
    write_invoice(
        invoice,
        &UblProfile {
            customization_id: PEPPOL_CUSTOMIZATION_ID,
            profile_id: PEPPOL_PROFILE_ID,
        },
    )
}
