//! JSON/CSV出力の統合テスト

use ocmt_common::{normalize, CsvOptions, MatchResponse};
use ocmt_match::cli::ExportFormat;
use ocmt_match::export::{self, DEFAULT_CSV_NAME, DEFAULT_JSON_NAME};
use ocmt_match::inputs::load_response;
use tempfile::tempdir;

const BODY: &str = r#"{
    "run_info": {"top_k": 3, "method": "hybrid", "weights": {"name": 0.6, "fields": 0.3, "keys": 0.1}},
    "counts": {"extractors": 2, "cds_views": 3},
    "matches": [
        {
            "extractor_name": "EXT1",
            "extractor_text": "Header",
            "candidates": [
                {"cds_view_name": "CDS1", "score": 0.8234, "name_score": 0.9, "field_overlap": 0.7,
                 "key_overlap": 0.5, "shared_fields": ["MANDT", "BUKRS"], "shared_keys": ["MANDT"],
                 "explain": {"weights": {"name": 0.6, "fields": 0.3, "keys": 0.1},
                             "score_parts": {"name": 0.54, "fields": 0.21, "keys": 0.05}}}
            ]
        },
        {
            "extractor_name": "EXT2",
            "extractor_text": "He said, \"hi\"",
            "candidates": [
                {"cds_view_name": "CDS, \"quoted\"", "score": 0.5, "shared_fields": []}
            ]
        }
    ],
    "server_note": "kept verbatim"
}"#;

fn response() -> MatchResponse {
    MatchResponse::from_json(BODY).expect("valid body")
}

#[test]
fn test_export_both_into_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let response = response();
    let rows = normalize(&response);

    let written = export::export_results(
        Some(&response),
        &rows,
        &ExportFormat::Both,
        dir.path(),
        CsvOptions::default(),
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    assert!(dir.path().join(DEFAULT_JSON_NAME).exists());
    assert!(dir.path().join(DEFAULT_CSV_NAME).exists());
}

/// JSONは受信した本文と同じ内容（未知フィールドも保持）
#[test]
fn test_json_export_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let response = response();

    let written = export::export_results(
        Some(&response),
        &[],
        &ExportFormat::Json,
        &dir.path().join("run1"),
        CsvOptions::default(),
    )
    .unwrap();
    assert_eq!(written, vec![dir.path().join("run1.json")]);

    let reloaded = load_response(&written[0]).unwrap();
    assert_eq!(reloaded.raw(), response.raw());
    assert_eq!(reloaded.raw()["server_note"], "kept verbatim");
}

#[test]
fn test_csv_export_parses_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("matches.csv");
    let response = response();
    let rows = normalize(&response);

    export::export_results(None, &rows, &ExportFormat::Csv, &path, CsvOptions::default()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\r\n"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "source", "target", "score", "name_score", "field_overlap", "key_overlap",
            "shared_fields", "shared_keys"
        ]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "EXT1");
    assert_eq!(&records[0][2], "0.823");
    assert_eq!(&records[0][6], "MANDT;BUKRS");
    assert_eq!(&records[1][1], "CDS, \"quoted\"");
    assert_eq!(&records[1][6], "");
}

#[test]
fn test_csv_without_shared_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("slim.csv");
    let rows = normalize(&response());

    export::export_results(
        None,
        &rows,
        &ExportFormat::Csv,
        &path,
        CsvOptions { include_shared: false },
    )
    .unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.headers().unwrap().len(), 6);
}

/// 結果が無い場合は何も書かない
#[test]
fn test_empty_export_is_noop() {
    let dir = tempdir().expect("Failed to create temp dir");

    let written = export::export_results(
        None,
        &[],
        &ExportFormat::Both,
        dir.path(),
        CsvOptions::default(),
    )
    .unwrap();

    assert!(written.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_export_off_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let response = response();
    let rows = normalize(&response);

    let written = export::export_results(
        Some(&response),
        &rows,
        &ExportFormat::Off,
        dir.path(),
        CsvOptions::default(),
    )
    .unwrap();
    assert!(written.is_empty());
}

/// 未作成のディレクトリ指定（末尾が区切り文字）は作成して既定名で書く
#[test]
fn test_export_into_new_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let target = format!("{}/results/", dir.path().display());
    let response = response();
    let rows = normalize(&response);

    let written = export::export_results(
        Some(&response),
        &rows,
        &ExportFormat::Both,
        std::path::Path::new(&target),
        CsvOptions::default(),
    )
    .unwrap();

    let results_dir = dir.path().join("results");
    assert_eq!(
        written,
        vec![results_dir.join(DEFAULT_JSON_NAME), results_dir.join(DEFAULT_CSV_NAME)]
    );
    assert!(results_dir.join(DEFAULT_JSON_NAME).is_file());
    assert!(results_dir.join(DEFAULT_CSV_NAME).is_file());
    assert!(!results_dir.join(".json").exists());
}
