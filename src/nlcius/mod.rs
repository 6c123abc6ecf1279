//! NLCIUS — the Dutch CIUS of EN 16931 over UBL 2.1.

mod validate;

pub use validate::validate_nlcius;

use crate::core::Invoice;
use crate::syntax::XmlResult;
use crate::syntax::ubl::{UblProfile, write_invoice};

/// NLCIUS specification identifier (BT-24).
pub const NLCIUS_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:nen.nl:nlcius:v1.0";

/// Business process identifier (BT-23).
pub const NLCIUS_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// Generate an NLCIUS-compliant UBL invoice.
pub fn to_ubl_xml(invoice: &Invoice) -> XmlResult {
    write_invoice(
        invoice,
        &UblProfile {
            customization_id: NLCIUS_CUSTOMIZATION_ID,
            profile_id: NLCIUS_PROFILE_ID,
        },
    )
}
