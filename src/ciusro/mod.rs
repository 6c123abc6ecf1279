//! CIUS-RO — the Romanian CIUS of EN 16931 over UBL 2.1 (e-Factura).

mod validate;

pub use validate::validate_ciusro;

use crate::core::Invoice;
use crate::syntax::XmlResult;
use crate::syntax::ubl::{UblProfile, write_invoice};

/// CIUS-RO specification identifier (BT-24).
pub const CIUSRO_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:efactura.mfinante.ro:CIUS-RO:1.0.1";

/// Business process identifier (BT-23).
pub const CIUSRO_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// Generate a CIUS-RO-compliant UBL invoice.
pub fn to_ubl_xml(invoice: &Invoice) -> XmlResult {
    write_invoice(
        invoice,
        &UblProfile {
            customization_id: CIUSRO_CUSTOMIZATION_ID,
            profile_id: CIUSRO_PROFILE_ID,
        },
    )
}
