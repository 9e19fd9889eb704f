//! サービス連携の統合テスト
//!
//! mockito のローカルサーバーに対して送信・正規化・エラー表示を検証

use mockito::{Matcher, Server};
use ocmt_common::{FilePayload, MatchInput, MatchSession, RequestState, Weights};
use ocmt_match::client::MatchClient;
use ocmt_match::error::OcmtError;
use ocmt_match::runner::run_match;

const RESPONSE: &str = r#"{
    "run_info": {"top_k": 2, "method": "hybrid", "weights": {"name": 0.6, "fields": 0.3, "keys": 0.1}},
    "counts": {"extractors": 1, "cds_views": 2},
    "matches": [{
        "extractor_name": "2LIS_11_VAHDR",
        "extractor_text": "Sales Document Header",
        "candidates": [
            {"cds_view_name": "I_SalesDocumentItem", "score": 0.41},
            {"cds_view_name": "I_SalesDocument", "score": 0.82, "shared_fields": ["VBELN", "ERDAT"]}
        ]
    }]
}"#;

fn sample_input() -> MatchInput {
    MatchInput {
        use_samples: true,
        top_k: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_samples_request_is_normalized() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/match/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("top_k".into(), "2".into()),
            Matcher::UrlEncoded("w_name".into(), "0.6".into()),
            Matcher::UrlEncoded("w_fields".into(), "0.3".into()),
            Matcher::UrlEncoded("w_keys".into(), "0.1".into()),
        ]))
        .match_body(Matcher::Regex(r#"name="use_samples""#.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RESPONSE)
        .create_async()
        .await;

    let client = MatchClient::new(&server.url(), None).unwrap();
    let mut session = MatchSession::new();
    let rows = run_match(&client, &mut session, &sample_input(), false)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].target, "I_SalesDocument");
    assert_eq!(rows[0].shared_fields, vec!["VBELN", "ERDAT"]);
    assert_eq!(session.state(), &RequestState::Ready);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_file_upload_parts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/match/")
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="ecc_csv"; filename="ecc.csv""#.into()),
            Matcher::Regex(r#"name="s4_csv"; filename="s4.csv""#.into()),
        ]))
        .with_status(200)
        .with_body(RESPONSE)
        .create_async()
        .await;

    let input = MatchInput {
        source_file: Some(FilePayload::csv("ecc.csv", b"extractor_name\nEXT1\n".to_vec())),
        target_file: Some(FilePayload::csv("s4.csv", b"cds_view_name\nCDS1\n".to_vec())),
        weights: Weights::new(2.0, 1.0, 1.0),
        ..Default::default()
    };

    let client = MatchClient::new(&server.url(), None).unwrap();
    let mut session = MatchSession::new();
    run_match(&client, &mut session, &input, false).await.unwrap();
    mock.assert_async().await;
}

/// 検証エラー時はリクエストを送らない
#[tokio::test]
async fn test_validation_error_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/match/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let input = MatchInput {
        source_file: Some(FilePayload::csv("ecc.csv", b"a\n".to_vec())),
        ..Default::default()
    };

    let client = MatchClient::new(&server.url(), None).unwrap();
    let mut session = MatchSession::new();
    let err = run_match(&client, &mut session, &input, false).await.unwrap_err();

    assert_eq!(err.banner_message(), "Provide both inputs or use server samples");
    assert_eq!(session.state(), &RequestState::Idle);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_error_detail_is_surfaced() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/match/")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "ecc_csv is missing required column extractor_name"}"#)
        .create_async()
        .await;

    let client = MatchClient::new(&server.url(), None).unwrap();
    let mut session = MatchSession::new();
    let err = run_match(&client, &mut session, &sample_input(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, OcmtError::Service { status: 400, .. }));
    assert_eq!(
        session.error(),
        Some("ecc_csv is missing required column extractor_name")
    );
    assert!(session.rows().is_empty());
    assert!(session.response().is_none());
}

#[tokio::test]
async fn test_malformed_body_fails_session() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/match/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"matches": "oops"}"#)
        .create_async()
        .await;

    let client = MatchClient::new(&server.url(), None).unwrap();
    let mut session = MatchSession::new();
    let err = run_match(&client, &mut session, &sample_input(), false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OcmtError::Common(ocmt_common::Error::MalformedResponse(_))
    ));
    assert!(matches!(session.state(), RequestState::Failed(_)));
    assert!(session.rows().is_empty());
}

#[tokio::test]
async fn test_non_json_body_fails_session() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/match/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;

    let client = MatchClient::new(&server.url(), None).unwrap();
    let mut session = MatchSession::new();
    let err = run_match(&client, &mut session, &sample_input(), false)
        .await
        .unwrap_err();

    assert!(err.banner_message().contains("not valid JSON"));
    assert!(matches!(session.state(), RequestState::Failed(_)));
}

#[tokio::test]
async fn test_health() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .create_async()
        .await;

    let client = MatchClient::new(&format!("{}/", server.url()), None).unwrap();
    assert_eq!(client.health().await.unwrap(), "ok");
}
