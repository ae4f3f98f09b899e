//! Bulk export/import through the service with real XLSX and CSV codecs

mod common;

use common::*;
use object_registry::contract::*;
use object_registry::domain::tabular::{Cell, TabularCodec, HEADER};
use object_registry::infra::tabular::XlsxCodec;
use rust_decimal::Decimal;
use std::str::FromStr;

fn csv_payload(rows: &[String]) -> Vec<u8> {
    let mut text = HEADER.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text.into_bytes()
}

fn new_row(name: &str, refs: Refs, condition: i32, passport: &str) -> String {
    format!(
        ",{},{},{},{},true,{},{},43.25,76.95,,0,",
        name, refs.region, refs.resource_type, refs.water_type, passport, condition
    )
}

async fn seed_objects(service: &object_registry::domain::Service, refs: Refs) -> Vec<InfrastructureObject> {
    let mut first = fields(refs, "Kapshagay", 2, date(2001, 3, 9));
    first.latitude = Some(Decimal::from_str("43.8756").unwrap());
    first.longitude = Some(Decimal::from_str("77.0712").unwrap());
    first.document = Some("passports/kapshagay.pdf".to_string());

    let mut second = fields(refs, "Sorbulak, east basin", 4, date(2018, 11, 30));
    second.fauna = false;

    vec![
        service.create_object(first).await.unwrap(),
        service.create_object(second).await.unwrap(),
    ]
}

// ===== Round trips =====

#[tokio::test]
async fn test_xlsx_export_import_round_trip() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;
    let before = seed_objects(&service, refs).await;

    let export = service.export_all().await.unwrap();
    let report = service.import_batch(&export.bytes).await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 2);
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let after = service.list_objects().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_csv_export_import_round_trip() {
    let store = MemoryStore::new();
    let service = csv_service(&store);
    let refs = seed_references(&service).await;
    let before = seed_objects(&service, refs).await;

    let export = service.export_all().await.unwrap();
    let report = service.import_batch(&export.bytes).await.unwrap();

    assert_eq!(report.updated, 2);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(before, service.list_objects().await.unwrap());
}

#[tokio::test]
async fn test_export_rows_follow_header() {
    let store = MemoryStore::new();
    let service = csv_service(&store);
    let refs = seed_references(&service).await;
    let objects = seed_objects(&service, refs).await;

    let text = String::from_utf8(service.export_all().await.unwrap().bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER.join(","));
    assert_eq!(
        lines[1],
        format!(
            "{},Kapshagay,{},{},{},true,2001-03-09,2,43.8756,77.0712,passports/kapshagay.pdf,{},2024-06-15T08:00:00Z",
            objects[0].id, refs.region, refs.resource_type, refs.water_type, objects[0].priority
        )
    );
    assert!(lines[2].contains("\"Sorbulak, east basin\""));
    assert!(lines[2].contains(",false,2018-11-30,4,,,,"));
}

// ===== Import semantics =====

#[tokio::test]
async fn test_import_creates_and_scores_new_rows() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    let payload = csv_payload(&[
        new_row("Ili delta", refs, 1, "2014-06-15"),
        new_row("Bartogay", refs, 5, "2024-06-15"),
    ]);
    let report = service.import_batch(&payload).await.unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);

    let objects = service.list_objects().await.unwrap();
    assert_eq!(objects[0].priority, 25);
    assert_eq!(objects[1].priority, 3);
    assert_eq!(objects[0].latitude, Some(Decimal::from_str("43.25").unwrap()));
    assert_eq!(store.priority_count(), 2);
}

#[tokio::test]
async fn test_one_bad_region_among_ten_rows() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    let mut rows: Vec<String> = (0..10)
        .map(|i| new_row(&format!("Object {}", i), refs, 3, "2015-01-01"))
        .collect();
    let bad_refs = Refs {
        region: 999,
        ..refs
    };
    rows[3] = new_row("Broken", bad_refs, 3, "2015-01-01");

    let report = service.import_batch(&csv_payload(&rows)).await.unwrap();

    assert_eq!(report.created, 9);
    assert_eq!(report.updated, 0);
    assert_eq!(
        report.errors,
        vec![RowError {
            row: 5,
            message: "region 999 does not exist".to_string(),
        }]
    );
    assert_eq!(store.object_count(), 9);
}

#[tokio::test]
async fn test_missing_header_column_rejects_batch() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "fauna").collect();
    let payload = format!(
        "{}\n,Lake,{},{},{},2015-01-01,3,,,,0,\n",
        header.join(","),
        refs.region,
        refs.resource_type,
        refs.water_type
    );

    let err = service.import_batch(payload.as_bytes()).await.unwrap_err();
    match err {
        RegistryError::SchemaMismatch { expected, found } => {
            assert_eq!(expected.len(), HEADER.len());
            assert_eq!(found.len(), HEADER.len() - 1);
        }
        other => panic!("expected a header mismatch, got {:?}", other),
    }
    assert_eq!(store.object_count(), 0);
}

#[tokio::test]
async fn test_empty_payload_is_a_header_mismatch() {
    let store = MemoryStore::new();
    let service = service(&store);

    assert!(matches!(
        service.import_batch(b"").await,
        Err(RegistryError::SchemaMismatch { .. })
    ));
}

#[tokio::test]
async fn test_corrupt_payloads_are_fatal() {
    let store = MemoryStore::new();
    let service = service(&store);

    let truncated_zip = b"PK\x03\x04\x14\x00\x00\x00garbage";
    assert!(matches!(
        service.import_batch(truncated_zip).await,
        Err(RegistryError::InvalidPayload { .. })
    ));

    let binary = [0x00, 0xff, 0xfe, 0x81, 0x92];
    assert!(matches!(
        service.import_batch(&binary).await,
        Err(RegistryError::InvalidPayload { .. })
    ));
    assert_eq!(store.object_count(), 0);
}

#[tokio::test]
async fn test_blank_rows_are_skipped_and_rows_keep_numbers() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    // Empty lines and a line of empty cells are both blank rows
    let rows = vec![
        new_row("First", refs, 3, "2015-01-01"),
        String::new(),
        ",,,,,,,,,,,,".to_string(),
        String::new(),
        new_row("Sixth", refs, 3, "not-a-date"),
        String::new(),
        new_row("Eighth", refs, 3, "2016-01-01"),
    ];
    let report = service.import_batch(&csv_payload(&rows)).await.unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 6);
    assert!(report.errors[0].message.starts_with("passport_date"));

    // A CRLF blank line counts once
    let payload = format!(
        "{}\r\n\r\n{}\r\n",
        HEADER.join(","),
        new_row("Third", refs, 9, "2015-01-01")
    );
    let report = service.import_batch(payload.as_bytes()).await.unwrap();
    assert_eq!(report.errors[0].row, 3);
}

#[tokio::test]
async fn test_row_with_failed_sync_is_not_applied() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;
    let existing = seed_objects(&service, refs).await;

    store.fail_priority_writes(true);
    let updated_row = format!(
        "{},Kapshagay renamed,{},{},{},true,2001-03-09,1,,,,0,",
        existing[0].id, refs.region, refs.resource_type, refs.water_type
    );
    let payload = csv_payload(&[new_row("Fresh", refs, 3, "2015-01-01"), updated_row]);
    let report = service.import_batch(&payload).await.unwrap();
    store.fail_priority_writes(false);

    assert_eq!((report.created, report.updated), (0, 0));
    assert_eq!(
        report.errors.iter().map(|e| e.row).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert_eq!(service.list_objects().await.unwrap(), existing);
    assert_eq!(
        service.get_priority(existing[0].id).await.unwrap().score,
        existing[0].priority
    );
}

#[tokio::test]
async fn test_update_of_unknown_id_is_a_row_error() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    let row = format!("999{}", new_row("Ghost", refs, 3, "2015-01-01"));
    let report = service.import_batch(&csv_payload(&[row])).await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.errors[0].message, "object 999 not found");
    assert_eq!(report.errors[0].row, 2);
}

#[tokio::test]
async fn test_document_column_is_ignored_on_import() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;
    let existing = seed_objects(&service, refs).await;

    let created_row = new_row("Fresh", refs, 3, "2015-01-01").replace(",,0,", ",uploads/fresh.pdf,0,");
    let updated_row = format!(
        "{},Kapshagay renamed,{},{},{},true,2001-03-09,2,,,other.pdf,0,",
        existing[0].id, refs.region, refs.resource_type, refs.water_type
    );
    let report = service
        .import_batch(&csv_payload(&[created_row, updated_row]))
        .await
        .unwrap();
    assert_eq!((report.created, report.updated), (1, 1));

    let objects = service.list_objects().await.unwrap();
    let renamed = objects.iter().find(|o| o.id == existing[0].id).unwrap();
    assert_eq!(renamed.name, "Kapshagay renamed");
    assert_eq!(renamed.document.as_deref(), Some("passports/kapshagay.pdf"));
    assert_eq!(renamed.latitude, None);

    let fresh = objects.iter().find(|o| o.name == "Fresh").unwrap();
    assert_eq!(fresh.document, None);
}

#[tokio::test]
async fn test_sheet_priority_is_replaced_by_computed_score() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    let row = new_row("Claimed", refs, 5, "2024-06-15").replace(",,0,", ",,99,");
    service.import_batch(&csv_payload(&[row])).await.unwrap();

    let object = &service.list_objects().await.unwrap()[0];
    assert_eq!(object.priority, 3);
}

#[tokio::test]
async fn test_xlsx_import_with_typed_cells() {
    let store = MemoryStore::new();
    let service = service(&store);
    let refs = seed_references(&service).await;

    let text = |s: &str| Cell::Text(s.to_string());
    let passport = chrono::NaiveDate::from_ymd_opt(2010, 6, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let grid = vec![
        HEADER.iter().map(|h| text(h)).collect::<Vec<_>>(),
        vec![
            Cell::Empty,
            text("Native"),
            Cell::Int(refs.region.into()),
            Cell::Int(refs.resource_type.into()),
            Cell::Int(refs.water_type.into()),
            Cell::Bool(false),
            Cell::DateTime(passport),
            Cell::Int(4),
            Cell::Float(51.5),
            Cell::Float(-0.125),
        ],
    ];
    let payload = XlsxCodec.encode(&grid).unwrap();

    let report = service.import_batch(&payload).await.unwrap();
    assert_eq!(report.created, 1, "{:?}", report.errors);

    let object = &service.list_objects().await.unwrap()[0];
    assert!(!object.fauna);
    assert_eq!(object.passport_date, date(2010, 6, 15));
    assert_eq!(object.longitude, Some(Decimal::from_str("-0.125").unwrap()));
    // (6 - 4) * 3 + 14
    assert_eq!(object.priority, 20);
}
