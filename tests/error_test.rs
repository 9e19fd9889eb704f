//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use ocmt_common::{MatchInput, MatchSession};
use ocmt_match::error::OcmtError;
use ocmt_match::explain::explain_row;
use ocmt_match::inputs::{load_response, read_csv_payload};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない入力ファイル
#[test]
fn test_missing_csv() {
    let err = read_csv_payload(Path::new("/nonexistent/path/ecc.csv")).unwrap_err();
    assert!(matches!(err, OcmtError::FileNotFound(_)));
}

/// JSONでないファイル
#[test]
fn test_load_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "not json").unwrap();

    let err = load_response(&path).unwrap_err();
    assert!(matches!(err, OcmtError::Common(_)));
}

/// matches を欠くレスポンス
#[test]
fn test_load_missing_matches() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"run_info": {}}"#).unwrap();

    assert!(load_response(&path).is_err());
}

/// 存在しない行ID
#[test]
fn test_explain_unknown_row() {
    let err = explain_row(&[], Some("EXT1::CDS1::0")).unwrap_err();
    assert!(matches!(err, OcmtError::RowNotFound(_)));
}

/// top_k が0以下なら検証エラー
#[test]
fn test_invalid_top_k() {
    let mut session = MatchSession::new();
    let input = MatchInput {
        use_samples: true,
        top_k: 0,
        ..Default::default()
    };
    let err = OcmtError::from(session.begin(&input).unwrap_err());
    assert!(err.banner_message().contains("top_k"));
    assert!(!session.is_in_flight());
}

/// OcmtErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        OcmtError::Config("テスト設定エラー".to_string()),
        OcmtError::FileNotFound("ecc.csv".to_string()),
        OcmtError::Service { status: 500, message: "boom".to_string() },
        OcmtError::RowNotFound("x".to_string()),
        OcmtError::NoResults,
    ];

    for err in errors {
        let msg = err.to_string();
        assert!(!msg.is_empty(), "エラーメッセージが空");
    }

    let service = OcmtError::Service { status: 502, message: "Bad Gateway".to_string() };
    assert_eq!(service.to_string(), "サービスエラー (HTTP 502): Bad Gateway");
    assert_eq!(service.banner_message(), "Bad Gateway");
}
