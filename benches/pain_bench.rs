use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use lastschrift::core::*;
use lastschrift::pain008::{self, PainDocumentType};

fn collection_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn build_batch(tx_count: usize) -> CollectorPaymentInfoPain {
    let mut builder = PaymentInfoBuilder::new("BENCH-PMT", collection_date())
        .sequence_type(SequenceType::Rcur)
        .creditor(CreditorInfo::new(
            "Benchmark GmbH",
            "DE89370400440532013000",
            "COBADEFFXXX",
            "DE98ZZZ09999999999",
        ));

    for i in 0..tx_count {
        builder = builder.add_transaction(
            TransactionBuilder::new(format!("E2E-{i}"), Decimal::new(1000 + i as i64, 2))
                .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
                .mandate(format!("M-{i}"), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                .remittance_info(format!("Beitrag {i}"))
                .build()
                .unwrap(),
        );
    }
    builder.build().unwrap()
}

fn bench_header() -> GroupHeaderInfo {
    GroupHeaderInfo::new(
        "BENCH-MSG",
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
        "Benchmark GmbH",
    )
}

fn bench_create_document_xml(c: &mut Criterion) {
    let header = bench_header();
    let small = [build_batch(10)];
    let large = [build_batch(1000)];

    c.bench_function("create_xml_00800108_10tx", |b| {
        b.iter(|| {
            pain008::create_document_xml(
                PainDocumentType::Pain00800108,
                black_box(&header),
                black_box(&small),
            )
            .unwrap()
        })
    });

    c.bench_function("create_xml_00800108_1000tx", |b| {
        b.iter(|| {
            pain008::create_document_xml(
                PainDocumentType::Pain00800108,
                black_box(&header),
                black_box(&large),
            )
            .unwrap()
        })
    });

    c.bench_function("create_xml_00800302_10tx", |b| {
        b.iter(|| {
            pain008::create_document_xml(
                PainDocumentType::Pain00800302,
                black_box(&header),
                black_box(&small),
            )
            .unwrap()
        })
    });
}

fn bench_parse_document(c: &mut Criterion) {
    let header = bench_header();
    let xml = pain008::create_document_xml(
        PainDocumentType::Pain00800108,
        &header,
        &[build_batch(100)],
    )
    .unwrap();

    c.bench_function("parse_00800108_100tx", |b| {
        b.iter(|| {
            pain008::parse_document(PainDocumentType::Pain00800108, black_box(xml.as_bytes()))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_create_document_xml, bench_parse_document);
criterion_main!(benches);
