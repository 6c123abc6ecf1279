//! Validation pipeline integration tests.

use chrono::NaiveDate;
use efaktura::convert::{self, Format};
use efaktura::core::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller() -> Party {
    PartyBuilder::new("Seller GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
        .vat_id("DE123456789")
        .electronic_address("EM", "billing@seller.example")
        .contact(
            Some("Erika Beispiel".into()),
            Some("+49 30 555 0100".into()),
            Some("erika@seller.example".into()),
        )
        .build()
}

fn buyer() -> Party {
    PartyBuilder::new("Buyer AG", "Marienplatz 1", "München", "80331", "DE")
        .electronic_address("EM", "invoice@buyer.example")
        .build()
}

fn payment() -> PaymentInstructions {
    PaymentInstructions {
        means_code: PaymentMeansCode::SepaCreditTransfer,
        remittance_info: Some("INV-001".into()),
        credit_transfer: Some(CreditTransfer {
            iban: "DE89370400440532013000".into(),
            bic: Some("COBADEFFXXX".into()),
            account_name: Some("Seller GmbH".into()),
        }),
    }
}

/// The reference invoice: one "Service" line, 100.00 net at 19%,
/// 119.00 gross.
fn reference_invoice() -> Invoice {
    InvoiceBuilder::new("INV-001", date(2026, 1, 15))
        .buyer_reference("04011000-12345-03")
        .seller(seller())
        .buyer(buyer())
        .payment(payment())
        .add_line(
            LineItemBuilder::new("1", "Service", dec!(1), "C62", dec!(100))
                .tax_rate(dec!(19))
                .build(),
        )
        .totals(dec!(100.00), dec!(19.00), dec!(119.00))
        .build()
}

#[test]
fn reference_invoice_has_zero_errors_for_german_profile() {
    let report = convert::validate_for(&reference_invoice(), Format::XRechnungUbl);
    let errors: Vec<_> = report.errors().collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(report.status(), ValidationStatus::Valid);
}

#[test]
fn generated_xml_carries_rate_and_grand_total() {
    let inv = reference_invoice();

    let ubl = convert::generate(&inv, Format::XRechnungUbl).unwrap();
    assert!(ubl.xml.contains("<cbc:Percent>19.00</cbc:Percent>"));
    assert!(ubl.xml.contains(">119.00</cbc:TaxInclusiveAmount>"));

    let cii = convert::generate(&inv, Format::XRechnungCii).unwrap();
    assert!(cii.xml.contains("<ram:RateApplicablePercent>19.00</ram:RateApplicablePercent>"));
    assert!(cii.xml.contains("<ram:GrandTotalAmount>119.00</ram:GrandTotalAmount>"));
}

#[test]
fn findings_are_identical_across_runs() {
    let mut inv = reference_invoice();
    // Break a few things so the report is non-trivial.
    inv.buyer.address.country_code = "XX".into();
    inv.lines[0].unit = "BOGUS".into();
    inv.totals.tax_total = dec!(18.00);

    let first = convert::validate_for(&inv, Format::XRechnungUbl);
    let second = convert::validate_for(&inv, Format::XRechnungUbl);
    assert_eq!(first.findings, second.findings);
    assert!(!first.findings.is_empty());
}

#[test]
fn stage_failures_accumulate_instead_of_blocking() {
    let mut inv = reference_invoice();
    inv.number = "".into(); // stage 1
    inv.totals.gross_total = dec!(500.00); // stage 2
    inv.buyer_reference = None; // stage 3 (profile)

    let report = convert::validate_for(&inv, Format::XRechnungUbl);
    let rules: Vec<&str> = report.findings.iter().map(|f| f.rule.as_str()).collect();
    assert!(rules.contains(&"BR-02"), "stage 1 finding missing: {rules:?}");
    assert!(rules.contains(&"BR-CO-15"), "stage 2 finding missing: {rules:?}");
    assert!(rules.contains(&"BR-DE-15"), "stage 3 finding missing: {rules:?}");
}

#[test]
fn missing_lines_short_circuits_with_one_fatal_finding() {
    let inv = InvoiceBuilder::new("INV-EMPTY", date(2026, 1, 15))
        .seller(seller())
        .buyer(buyer())
        .totals(dec!(0), dec!(0), dec!(0))
        .build();
    let report = convert::validate_for(&inv, Format::PeppolBis);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].rule, "BR-16");
    assert_eq!(report.status(), ValidationStatus::Invalid);
}

#[test]
fn spec_gross_pricing_scenario_is_not_a_basis_mismatch() {
    // Lines total 3159.25 gross, a 319.25 allowance, declared subtotal
    // 2386.55 at 19% — classify as gross-priced, report no mismatch.
    let inv = InvoiceBuilder::new("INV-GROSS", date(2026, 1, 15))
        .buyer_reference("04011000-12345-03")
        .seller(seller())
        .buyer(buyer())
        .payment(payment())
        .add_line(
            LineItemBuilder::new("1", "Bundle", dec!(1), "C62", dec!(3159.25))
                .tax_rate(dec!(19))
                .build(),
        )
        .add_allowance_charge(AllowanceCharge {
            is_charge: false,
            amount: dec!(319.25),
            percentage: None,
            base_amount: None,
            tax_rate: Some(dec!(19)),
            tax_category: None,
            reason: Some("Discount".into()),
        })
        .totals(dec!(2386.55), dec!(453.44), dec!(2839.99))
        .build();

    let report = convert::validate_for(&inv, Format::XRechnungUbl);
    assert!(
        !report.findings.iter().any(|f| f.rule == "BR-CO-13"),
        "gross-priced invoice flagged as mismatch: {:?}",
        report.findings
    );
    assert!(report.errors().next().is_none(), "{:?}", report.findings);
}

#[test]
fn warnings_only_invoice_reports_warning_status() {
    let mut inv = reference_invoice();
    inv.lines[0].unit = "BOGUS".into(); // warning, not error
    let report = convert::validate_for(&inv, Format::XRechnungUbl);
    assert_eq!(report.status(), ValidationStatus::Warnings);
    assert!(report.errors().next().is_none());
}

#[test]
fn credit_note_without_reference_is_invalid_everywhere() {
    let mut inv = reference_invoice();
    inv.type_code = InvoiceTypeCode::CreditNote;
    for format in Format::ALL {
        let report = convert::validate_for(&inv, format);
        assert!(
            report.findings.iter().any(|f| f.rule == "BR-55"),
            "{format}: BR-55 missing"
        );
    }
}

#[test]
fn ambiguous_date_is_rejected() {
    assert!(matches!(
        parse_date("03/04/2025"),
        Err(ConvertError::AmbiguousDate(_))
    ));
}

#[test]
fn canonical_model_round_trips_through_json() {
    let inv = reference_invoice();
    let json = serde_json::to_string(&inv).unwrap();
    let back: Invoice = serde_json::from_str(&json).unwrap();
    assert_eq!(back.number, inv.number);
    assert_eq!(back.totals.gross_total, inv.totals.gross_total);
    assert_eq!(back.lines.len(), inv.lines.len());
    assert_eq!(back.seller.vat_id, inv.seller.vat_id);

    // And validation of the round-tripped value is unchanged.
    let a = convert::validate_for(&inv, Format::XRechnungUbl);
    let b = convert::validate_for(&back, Format::XRechnungUbl);
    assert_eq!(a.findings, b.findings);
}
