//! # efaktura
//!
//! Multi-standard e-invoicing engine: converts a canonical invoice
//! record into compliant XML for XRechnung (UBL + CII), Peppol BIS,
//! FatturaPA, KSeF, NLCIUS, Factur-X and CIUS-RO, and validates every
//! invoice against the EN 16931 semantic model plus country-specific
//! business rules before emission.
//!
//! All monetary values use [`rust_decimal::Decimal`] and flow through
//! the monetary kernel ([`core::money`]) — never floating point. Every
//! operation is a pure, synchronous transformation: no I/O, no clocks,
//! no randomness, so identical input produces byte-identical output.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use efaktura::core::*;
//! use efaktura::convert::{self, Format};
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new("INV-001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
//!     .seller(PartyBuilder::new("Seller GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
//!         .vat_id("DE123456789")
//!         .electronic_address("EM", "billing@seller.example")
//!         .contact(Some("Max Muster".into()), Some("+49 30 1234".into()), Some("max@seller.example".into()))
//!         .build())
//!     .buyer(PartyBuilder::new("Buyer AG", "Marienplatz 1", "München", "80331", "DE")
//!         .electronic_address("EM", "invoice@buyer.example")
//!         .build())
//!     .buyer_reference("04011000-12345-03")
//!     .add_line(LineItemBuilder::new("1", "Service", dec!(1), "C62", dec!(100))
//!         .tax_rate(dec!(19))
//!         .build())
//!     .build();
//!
//! let report = convert::validate_for(&invoice, Format::PeppolBis);
//! assert!(report.errors().next().is_none(), "{:?}", report.findings);
//!
//! let doc = convert::generate(&invoice, Format::XRechnungUbl).unwrap();
//! assert_eq!(doc.file_name, "INV-001_xrechnung-ubl.xml");
//! assert!(doc.xml.contains("119.00"));
//! ```

pub mod convert;
pub mod core;
pub mod guard;
pub mod syntax;

pub mod ciusro;
pub mod facturx;
pub mod fatturapa;
pub mod ksef;
pub mod nlcius;
pub mod peppol;
pub mod xrechnung;

pub use crate::convert::{Format, GeneratedDocument, generate, validate_for};
pub use crate::core::*;
