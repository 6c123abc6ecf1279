//! Canonical invoice model, monetary kernel and validation pipeline.

pub mod breakdown;
pub mod builder;
pub mod countries;
pub mod currencies;
pub mod dates;
pub mod error;
pub mod money;
pub mod types;
pub mod units;
pub mod validation;

pub use breakdown::{TaxBreakdown, effective_category, tax_breakdown};
pub use builder::{InvoiceBuilder, LineItemBuilder, PartyBuilder};
pub use dates::parse_date;
pub use error::{ConvertError, Severity, ValidationFinding};
pub use types::*;
pub use validation::{
    ValidationReport, ValidationStatus, validate_en16931, validate_monetary, validate_schema,
    validate_with_profile,
};
