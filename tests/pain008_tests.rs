use chrono::{NaiveDate, NaiveDateTime};
use lastschrift::core::*;
use lastschrift::pain008::{
    self, CollectionDatePolicy, DocumentOptions, PainDocumentType, ParsedDocument,
};
use rust_decimal_macros::dec;

const ALL_TYPES: [PainDocumentType; 3] = [
    PainDocumentType::Pain00800302,
    PainDocumentType::Pain00800102,
    PainDocumentType::Pain00800108,
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn date_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

fn header() -> GroupHeaderInfo {
    GroupHeaderInfo::new("MSG-1", date_time(2025, 5, 20, 10, 0), "ACME")
}

fn creditor() -> CreditorInfo {
    CreditorInfo::new(
        "ACME",
        "DE89370400440532013000",
        "COBADEFFXXX",
        "DE98ZZZ09999999999",
    )
}

/// One batch with a single 10.00 EUR transaction.
fn single_batch() -> CollectorPaymentInfoPain {
    PaymentInfoBuilder::new("PMT-1", date(2025, 6, 1))
        .sequence_type(SequenceType::Frst)
        .creditor(creditor())
        .add_transaction(
            TransactionBuilder::new("E2E-1", dec!(10.00))
                .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
                .mandate("M1", date(2024, 1, 1))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn second_batch() -> CollectorPaymentInfoPain {
    PaymentInfoBuilder::new("PMT-2", date(2025, 6, 15))
        .sequence_type(SequenceType::Rcur)
        .creditor(creditor())
        .add_transaction(
            TransactionBuilder::new("E2E-2", dec!(5.50))
                .debtor("A Schmidt", "DE02120300000000202051", "BYLADEM1001")
                .mandate("M2", date(2024, 2, 1))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[test]
fn generation_produces_valid_xml_for_every_version() {
    for doc_type in ALL_TYPES {
        let xml = pain008::create_document_xml(doc_type, &header(), &[single_batch()]).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(&format!("xmlns=\"{}\"", doc_type.namespace())));
        assert!(xml.contains(&format!(
            "xsi:schemaLocation=\"{}\"",
            doc_type.schema_location()
        )));
        assert!(xml.contains("<CstmrDrctDbtInitn>"));
    }
}

#[test]
fn single_batch_counts_and_sums() {
    let xml = pain008::create_document_xml(
        PainDocumentType::Pain00800108,
        &header(),
        &[single_batch()],
    )
    .unwrap();

    assert!(xml.contains("<MsgId>MSG-1</MsgId>"));
    assert!(xml.contains("<CreDtTm>2025-05-20T10:00:00</CreDtTm>"));
    assert!(xml.contains("<NbOfTxs>1</NbOfTxs>"));
    assert!(xml.contains("<CtrlSum>10.00</CtrlSum>"));
    assert!(xml.contains("<InstdAmt Ccy=\"EUR\">10.00</InstdAmt>"));
}

#[test]
fn two_batches_aggregate_at_message_level() {
    let doc = pain008::pain00800108::create_document(&header(), &[single_batch(), second_batch()])
        .unwrap();
    let grp_hdr = &doc.cstmr_drct_dbt_initn.grp_hdr;

    assert_eq!(grp_hdr.nb_of_txs, "2");
    assert_eq!(grp_hdr.ctrl_sum, Some(dec!(15.50)));

    let pmt_inf = &doc.cstmr_drct_dbt_initn.pmt_inf;
    assert_eq!(pmt_inf.len(), 2);
    assert_eq!(pmt_inf[0].nb_of_txs, "1");
    assert_eq!(pmt_inf[0].ctrl_sum, Some(dec!(10.00)));
    assert_eq!(pmt_inf[1].nb_of_txs, "1");
    assert_eq!(pmt_inf[1].ctrl_sum, Some(dec!(5.50)));
}

#[test]
fn batch_order_is_preserved() {
    let xml = pain008::create_document_xml(
        PainDocumentType::Pain00800102,
        &header(),
        &[single_batch(), second_batch()],
    )
    .unwrap();

    let first = xml.find("<PmtInfId>PMT-1</PmtInfId>").unwrap();
    let second = xml.find("<PmtInfId>PMT-2</PmtInfId>").unwrap();
    assert!(first < second);
}

#[test]
fn transaction_order_is_preserved() {
    let mut batch = single_batch();
    for i in 2..=5 {
        batch.transactions.push(
            TransactionBuilder::new(format!("E2E-{i}"), dec!(1.00))
                .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
                .mandate(format!("M{i}"), date(2024, 1, 1))
                .build()
                .unwrap(),
        );
    }
    let xml =
        pain008::create_document_xml(PainDocumentType::Pain00800108, &header(), &[batch]).unwrap();

    let mut last = 0;
    for i in 1..=5 {
        let pos = xml
            .find(&format!("<EndToEndId>E2E-{i}</EndToEndId>"))
            .unwrap();
        assert!(pos > last, "E2E-{i} out of order");
        last = pos;
    }
}

#[test]
fn fixed_sepa_constants_are_emitted() {
    for doc_type in ALL_TYPES {
        let xml = pain008::create_document_xml(doc_type, &header(), &[single_batch()]).unwrap();
        assert!(xml.contains("<PmtMtd>DD</PmtMtd>"));
        assert!(xml.contains("<ChrgBr>SLEV</ChrgBr>"));
        assert!(xml.contains("<Cd>SEPA</Cd>"));
        assert!(xml.contains("<Prtry>SEPA</Prtry>"));
        assert!(xml.contains("<SeqTp>FRST</SeqTp>"));
        assert!(xml.contains("<AmdmntInd>false</AmdmntInd>"));
        assert!(xml.contains("<DtOfSgntr>2024-01-01</DtOfSgntr>"));
        assert!(xml.contains("<ReqdColltnDt>2025-06-01</ReqdColltnDt>"));
    }
}

#[test]
fn bic_element_name_differs_per_version() {
    let v08 = pain008::create_document_xml(
        PainDocumentType::Pain00800108,
        &header(),
        &[single_batch()],
    )
    .unwrap();
    assert!(v08.contains("<BICFI>COBADEFFXXX</BICFI>"));
    assert!(!v08.contains("<BIC>"));

    for doc_type in [
        PainDocumentType::Pain00800302,
        PainDocumentType::Pain00800102,
    ] {
        let xml = pain008::create_document_xml(doc_type, &header(), &[single_batch()]).unwrap();
        assert!(xml.contains("<BIC>COBADEFFXXX</BIC>"));
        assert!(!xml.contains("<BICFI>"));
    }
}

#[test]
fn cor1_is_rejected_only_by_the_newest_version() {
    let mut batch = single_batch();
    batch.local_instrument = LocalInstrument::Cor1;

    for doc_type in [
        PainDocumentType::Pain00800302,
        PainDocumentType::Pain00800102,
    ] {
        let xml = pain008::create_document_xml(doc_type, &header(), &[batch.clone()]).unwrap();
        assert!(xml.contains("<Cd>COR1</Cd>"));
    }

    let err = pain008::create_document_xml(
        PainDocumentType::Pain00800108,
        &header(),
        &[batch],
    )
    .unwrap_err();
    assert!(matches!(err, PainError::Build(_)));
}

#[test]
fn ultimate_debtor_is_omitted_when_absent() {
    let xml = pain008::create_document_xml(
        PainDocumentType::Pain00800108,
        &header(),
        &[single_batch()],
    )
    .unwrap();
    assert!(!xml.contains("<UltmtDbtr>"));

    let mut batch = single_batch();
    batch.transactions[0].ult_dbtr_name = Some("E Doe".into());
    let xml =
        pain008::create_document_xml(PainDocumentType::Pain00800108, &header(), &[batch]).unwrap();
    assert!(xml.contains("<UltmtDbtr>"));
    assert!(xml.contains("<Nm>E Doe</Nm>"));
}

#[test]
fn remittance_info_is_a_single_unstructured_line() {
    let mut batch = single_batch();
    batch.transactions[0].remittance_info = Some("Rechnung RE-2025-042".into());
    for doc_type in ALL_TYPES {
        let xml =
            pain008::create_document_xml(doc_type, &header(), &[batch.clone()]).unwrap();
        assert!(xml.contains("<Ustrd>Rechnung RE-2025-042</Ustrd>"));
    }
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[test]
fn empty_batch_is_rejected_for_every_version() {
    let mut batch = single_batch();
    batch.transactions.clear();
    for doc_type in ALL_TYPES {
        let err =
            pain008::create_document_xml(doc_type, &header(), &[batch.clone()]).unwrap_err();
        assert!(
            matches!(
                err,
                PainError::Validation {
                    kind: ValidationKind::General,
                    ..
                }
            ),
            "unexpected error for {}: {err}",
            doc_type.name()
        );
    }
}

#[test]
fn document_without_batches_is_rejected() {
    for doc_type in ALL_TYPES {
        let err = pain008::create_document_xml(doc_type, &header(), &[]).unwrap_err();
        assert!(matches!(
            err,
            PainError::Validation {
                kind: ValidationKind::General,
                ..
            }
        ));
    }
}

#[test]
fn non_positive_amount_is_rejected_before_tree_construction() {
    let mut batch = single_batch();
    batch.transactions[0].amount = dec!(-1.00);
    for doc_type in ALL_TYPES {
        let err =
            pain008::create_document_xml(doc_type, &header(), &[batch.clone()]).unwrap_err();
        assert!(matches!(
            err,
            PainError::Validation {
                kind: ValidationKind::InvalidAmount,
                ..
            }
        ));
    }
}

#[test]
fn invalid_header_is_reported_before_the_date_policy() {
    let mut batch = single_batch();
    batch.collection_date = date(2025, 1, 1);
    let bad_header = GroupHeaderInfo::new("", date_time(2025, 5, 20, 10, 0), "ACME");
    let reject = DocumentOptions {
        collection_date_policy: CollectionDatePolicy::Reject,
    };

    let err = pain008::create_document_xml_with(
        PainDocumentType::Pain00800108,
        &bad_header,
        &[batch],
        &reject,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PainError::Validation {
            kind: ValidationKind::MissingField,
            ..
        }
    ));
}

#[test]
fn past_collection_date_honours_the_policy() {
    let mut batch = single_batch();
    batch.collection_date = date(2025, 1, 1); // before the 2025-05-20 creation date

    // Default: pass through unchecked, like the banks' own tooling.
    assert!(
        pain008::create_document_xml(PainDocumentType::Pain00800108, &header(), &[batch.clone()])
            .is_ok()
    );

    let reject = DocumentOptions {
        collection_date_policy: CollectionDatePolicy::Reject,
    };
    let err = pain008::create_document_xml_with(
        PainDocumentType::Pain00800108,
        &header(),
        &[batch],
        &reject,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PainError::Validation {
            kind: ValidationKind::InvalidDate,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Parsing / round-trip
// ---------------------------------------------------------------------------

#[test]
fn header_round_trips_through_every_version() {
    for doc_type in ALL_TYPES {
        let xml = pain008::create_document_xml(doc_type, &header(), &[single_batch()]).unwrap();
        let parsed = pain008::parse_document(doc_type, xml.as_bytes()).unwrap();

        let (msg_id, cre_dt_tm, initiator) = match parsed {
            ParsedDocument::Pain00800302(doc) => {
                let h = doc.cstmr_drct_dbt_initn.grp_hdr;
                (h.msg_id, h.cre_dt_tm, h.initg_pty.nm)
            }
            ParsedDocument::Pain00800102(doc) => {
                let h = doc.cstmr_drct_dbt_initn.grp_hdr;
                (h.msg_id, h.cre_dt_tm, h.initg_pty.nm)
            }
            ParsedDocument::Pain00800108(doc) => {
                let h = doc.cstmr_drct_dbt_initn.grp_hdr;
                (h.msg_id, h.cre_dt_tm, h.initg_pty.nm)
            }
        };

        assert_eq!(msg_id, "MSG-1", "{}", doc_type.name());
        assert_eq!(cre_dt_tm, "2025-05-20T10:00:00");
        assert_eq!(initiator.as_deref(), Some("ACME"));
    }
}

#[test]
fn parsed_tree_preserves_transaction_detail() {
    let mut batch = single_batch();
    batch.transactions[0].remittance_info = Some("Mitgliedsbeitrag 2025".into());
    let xml =
        pain008::create_document_xml(PainDocumentType::Pain00800108, &header(), &[batch]).unwrap();

    let doc = pain008::pain00800108::from_xml(&xml).unwrap();
    let pmt_inf = &doc.cstmr_drct_dbt_initn.pmt_inf[0];
    assert_eq!(pmt_inf.pmt_inf_id, "PMT-1");
    assert_eq!(pmt_inf.ctrl_sum, Some(dec!(10.00)));

    let tx = &pmt_inf.drct_dbt_tx_inf[0];
    assert_eq!(tx.pmt_id.end_to_end_id, "E2E-1");
    assert_eq!(tx.instd_amt.ccy, "EUR");
    assert_eq!(tx.instd_amt.value, dec!(10.00));
    assert_eq!(tx.dbtr.nm.as_deref(), Some("J Doe"));
    assert_eq!(tx.dbtr_acct.id.iban, "DE02100100100006820101");
    assert_eq!(tx.drct_dbt_tx.mndt_rltd_inf.mndt_id, "M1");
    assert_eq!(tx.drct_dbt_tx.mndt_rltd_inf.dt_of_sgntr, "2024-01-01");
    assert_eq!(
        tx.rmt_inf.as_ref().unwrap().ustrd,
        vec!["Mitgliedsbeitrag 2025".to_string()]
    );
}

#[test]
fn control_sums_round_trip_through_every_version() {
    for doc_type in ALL_TYPES {
        let xml =
            pain008::create_document_xml(doc_type, &header(), &[single_batch(), second_batch()])
                .unwrap();
        let parsed = pain008::parse_document(doc_type, xml.as_bytes()).unwrap();

        let (msg_sum, batch_sums) = match parsed {
            ParsedDocument::Pain00800302(doc) => {
                let initn = doc.cstmr_drct_dbt_initn;
                (
                    initn.grp_hdr.ctrl_sum,
                    initn.pmt_inf.iter().map(|p| p.ctrl_sum).collect::<Vec<_>>(),
                )
            }
            ParsedDocument::Pain00800102(doc) => {
                let initn = doc.cstmr_drct_dbt_initn;
                (
                    initn.grp_hdr.ctrl_sum,
                    initn.pmt_inf.iter().map(|p| p.ctrl_sum).collect::<Vec<_>>(),
                )
            }
            ParsedDocument::Pain00800108(doc) => {
                let initn = doc.cstmr_drct_dbt_initn;
                (
                    initn.grp_hdr.ctrl_sum,
                    initn.pmt_inf.iter().map(|p| p.ctrl_sum).collect::<Vec<_>>(),
                )
            }
        };

        assert_eq!(msg_sum, Some(dec!(15.50)), "{}", doc_type.name());
        assert_eq!(batch_sums, vec![Some(dec!(10.00)), Some(dec!(5.50))]);
    }
}

#[test]
fn parsing_rejects_a_document_of_another_version() {
    let xml = pain008::create_document_xml(
        PainDocumentType::Pain00800102,
        &header(),
        &[single_batch()],
    )
    .unwrap();

    // The 003.02 tree is structurally compatible, so without the namespace
    // check this would come back mislabeled as a DK document.
    let err = pain008::parse_document(PainDocumentType::Pain00800302, xml.as_bytes()).unwrap_err();
    match err {
        PainError::Xml(msg) => assert!(msg.contains("namespace mismatch"), "{msg}"),
        other => panic!("expected Xml error, got {other}"),
    }
}

#[test]
fn creditor_scheme_id_round_trips() {
    let xml = pain008::create_document_xml(
        PainDocumentType::Pain00800102,
        &header(),
        &[single_batch()],
    )
    .unwrap();
    let doc = pain008::pain00800102::from_xml(&xml).unwrap();
    let schme = &doc.cstmr_drct_dbt_initn.pmt_inf[0].cdtr_schme_id;
    let othr = &schme.id.as_ref().unwrap().prvt_id.othr[0];
    assert_eq!(othr.id, "DE98ZZZ09999999999");
    assert_eq!(othr.schme_nm.prtry, "SEPA");
}

#[test]
fn garbage_input_yields_xml_error() {
    let err = pain008::parse_document(
        PainDocumentType::Pain00800108,
        &b"this is not xml"[..],
    )
    .unwrap_err();
    assert!(matches!(err, PainError::Xml(_)));
}
