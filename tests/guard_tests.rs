//! Trust-boundary tests for the XML security guard.

use chrono::NaiveDate;
use efaktura::convert::{self, Format};
use efaktura::core::*;
use efaktura::guard::{GuardPolicy, GuardViolation, inspect_xml, sanitize_xml};
use rust_decimal_macros::dec;

fn generated_invoice_xml() -> String {
    let inv = InvoiceBuilder::new("G-1", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        .seller(
            PartyBuilder::new("Seller GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
                .vat_id("DE123456789")
                .build(),
        )
        .buyer(PartyBuilder::new("Buyer AG", "Marienplatz 1", "München", "80331", "DE").build())
        .add_line(
            LineItemBuilder::new("1", "Service", dec!(1), "C62", dec!(100))
                .tax_rate(dec!(19))
                .build(),
        )
        .build();
    convert::generate(&inv, Format::XRechnungUbl).unwrap().xml
}

#[test]
fn generator_output_passes_every_check() {
    let xml = generated_invoice_xml();
    assert_eq!(inspect_xml(&xml, &GuardPolicy::default()), Ok(()));
}

#[test]
fn system_external_entity_has_specific_rule_code() {
    let xml = "<foo><!ENTITY xxe SYSTEM \"file:///etc/passwd\">&xxe;</foo>";
    let err = inspect_xml(xml, &GuardPolicy::default()).unwrap_err();
    assert_eq!(err.rule_id(), "XSG-03");
    assert!(matches!(err, GuardViolation::ExternalEntity(_)));
}

#[test]
fn six_hundred_custom_entities_rejected_as_expansion() {
    let refs: String = (0..600).map(|i| format!("&bomb{i};")).collect();
    let xml = format!(
        "<ubl:Invoice xmlns:ubl=\"urn:oasis:names:specification:ubl:schema:xsd:Invoice-2\">{refs}</ubl:Invoice>"
    );
    let err = inspect_xml(&xml, &GuardPolicy::default()).unwrap_err();
    assert_eq!(err.rule_id(), "XSG-04");
    assert!(matches!(
        err,
        GuardViolation::EntityExpansion { count: 600, .. }
    ));
}

#[test]
fn unknown_namespace_rejected_even_on_valid_structure() {
    let mut xml = generated_invoice_xml();
    xml = xml.replace(
        "xmlns:cbc=\"urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2\"",
        "xmlns:cbc=\"http://attacker.example/cbc\"",
    );
    let err = inspect_xml(&xml, &GuardPolicy::default()).unwrap_err();
    assert_eq!(err.rule_id(), "XSG-05");
}

#[test]
fn checks_run_in_fixed_order() {
    // A document that is both oversized and carries a DOCTYPE: the size
    // ceiling fires first.
    let xml = format!("<!DOCTYPE a><a>{}</a>", "x".repeat(64));
    let policy = GuardPolicy {
        max_bytes: 32,
        ..GuardPolicy::default()
    };
    assert_eq!(
        inspect_xml(&xml, &policy).unwrap_err().rule_id(),
        "XSG-01"
    );
    // With a generous ceiling the DOCTYPE check fires next.
    assert_eq!(
        inspect_xml(&xml, &GuardPolicy::default()).unwrap_err().rule_id(),
        "XSG-02"
    );
}

#[test]
fn sanitize_neutralizes_instead_of_rejecting() {
    let hostile = format!(
        "<!DOCTYPE foo [<!ENTITY xxe SYSTEM \"file:///etc/passwd\">]>{}",
        generated_invoice_xml()
    );
    assert!(inspect_xml(&hostile, &GuardPolicy::default()).is_err());

    let cleaned = sanitize_xml(&hostile);
    assert_eq!(inspect_xml(&cleaned, &GuardPolicy::default()), Ok(()));
    assert!(cleaned.contains("<ubl:Invoice"));
}

#[test]
fn all_format_outputs_stay_inside_the_namespace_allow_list() {
    let inv = InvoiceBuilder::new("G-2", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        .seller(
            PartyBuilder::new("Seller GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
                .vat_id("DE123456789")
                .tax_number("5260250995")
                .build(),
        )
        .buyer(PartyBuilder::new("Buyer AG", "Marienplatz 1", "München", "80331", "DE").build())
        .add_line(
            LineItemBuilder::new("1", "Service", dec!(1), "C62", dec!(100))
                .tax_rate(dec!(19))
                .build(),
        )
        .build();

    for format in Format::ALL {
        let doc = convert::generate(&inv, format).unwrap();
        assert_eq!(
            inspect_xml(&doc.xml, &GuardPolicy::default()),
            Ok(()),
            "{format} output rejected by guard"
        );
    }
}
