use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use efaktura::convert::{self, Format};
use efaktura::core::*;

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

fn build_invoice(lines: usize) -> Invoice {
    let mut builder = InvoiceBuilder::new("BENCH-001", bench_date())
        .buyer_reference("04011000-12345-03")
        .seller(
            PartyBuilder::new("Benchmark GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
                .vat_id("DE123456789")
                .electronic_address("EM", "billing@bench.example")
                .contact(
                    Some("Max Mustermann".into()),
                    Some("+49 30 12345".into()),
                    Some("max@bench.example".into()),
                )
                .build(),
        )
        .buyer(
            PartyBuilder::new("Kunde AG", "Leopoldstr. 42", "München", "80331", "DE")
                .electronic_address("EM", "rechnung@kunde.example")
                .build(),
        )
        .payment(PaymentInstructions {
            means_code: PaymentMeansCode::SepaCreditTransfer,
            remittance_info: Some("BENCH-001".into()),
            credit_transfer: Some(CreditTransfer {
                iban: "DE89370400440532013000".into(),
                bic: Some("COBADEFFXXX".into()),
                account_name: Some("Benchmark GmbH".into()),
            }),
        });

    for i in 1..=lines {
        builder = builder.add_line(
            LineItemBuilder::new(i.to_string(), format!("Service item {i}"), dec!(5), "HUR", dec!(120))
                .tax_rate(dec!(19))
                .build(),
        );
    }
    builder.build()
}

fn validation_benches(c: &mut Criterion) {
    let small = build_invoice(10);
    let large = build_invoice(1000);

    c.bench_function("validate_xrechnung_10_lines", |b| {
        b.iter(|| convert::validate_for(black_box(&small), Format::XRechnungUbl))
    });
    c.bench_function("validate_xrechnung_1000_lines", |b| {
        b.iter(|| convert::validate_for(black_box(&large), Format::XRechnungUbl))
    });
}

fn generation_benches(c: &mut Criterion) {
    let small = build_invoice(10);
    let large = build_invoice(1000);

    c.bench_function("generate_ubl_10_lines", |b| {
        b.iter(|| convert::generate(black_box(&small), Format::XRechnungUbl).unwrap())
    });
    c.bench_function("generate_cii_10_lines", |b| {
        b.iter(|| convert::generate(black_box(&small), Format::XRechnungCii).unwrap())
    });
    c.bench_function("generate_ubl_1000_lines", |b| {
        b.iter(|| convert::generate(black_box(&large), Format::XRechnungUbl).unwrap())
    });
}

criterion_group!(benches, validation_benches, generation_benches);
criterion_main!(benches);
