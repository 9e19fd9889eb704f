//! マッチングサービスとのHTTP連携
//!
//! 1回の送信につき1リクエスト。リトライはしない。
//! - スカラー値（top_k・重み）はクエリパラメータ
//! - ファイルはマルチパート（ecc_csv / s4_csv）、サンプル指定は use_samples=true

use crate::error::{OcmtError, Result};
use ocmt_common::request::{InputMode, MatchRequest, SOURCE_PART, TARGET_PART};
use ocmt_common::FilePayload;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

const BODY_PREVIEW_LIMIT: usize = 512;

/// ログ用にレスポンス本文を切り詰める
fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}

/// 非2xxレスポンスを1行のメッセージにする
///
/// 優先順位: JSONの `detail`（文字列、または `msg` を持つオブジェクト配列）
/// → `message` / `error` → 本文そのまま → `HTTP {status}`
pub fn service_error_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = structured_message(&value) {
            return message;
        }
    }

    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    format!("HTTP {}", status)
}

fn structured_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;

    match object.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    ["message", "error"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn file_part(payload: &FilePayload) -> Result<Part> {
    let part = Part::bytes(payload.bytes.clone())
        .file_name(payload.file_name.clone())
        .mime_str(payload.format.mime_type())?;
    Ok(part)
}

/// マルチパート本文を組み立てる
pub fn build_form(request: &MatchRequest) -> Result<Form> {
    let form = match &request.mode {
        InputMode::Files { source, target } => Form::new()
            .part(SOURCE_PART, file_part(source)?)
            .part(TARGET_PART, file_part(target)?),
        InputMode::Samples => Form::new().text("use_samples", "true"),
    };
    Ok(form)
}

#[derive(Clone)]
pub struct MatchClient {
    http: reqwest::Client,
    url_match: String,
    url_health: String,
}

impl MatchClient {
    /// `timeout` が None ならクライアント側のタイムアウトは設けない
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let normalized = base_url.trim_end_matches('/');
        Ok(Self {
            http,
            url_match: format!("{}/match/", normalized),
            url_health: format!("{}/health", normalized),
        })
    }

    /// マッチングを実行し、レスポンス本文（JSON）を返す
    ///
    /// 形の検証はしない（セッション側で正規化する）。
    pub async fn post_match(&self, request: &MatchRequest) -> Result<Value> {
        let url = &self.url_match;
        tracing::debug!(
            target: "ocmt.client",
            stage = "match.in",
            url = %url,
            top_k = request.top_k,
            use_samples = request.uses_samples(),
            w_name = request.weights.name,
            w_fields = request.weights.fields,
            w_keys = request.weights.keys
        );

        let form = build_form(request)?;
        let resp = self
            .http
            .post(url)
            .query(&request.query_pairs())
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(
            target: "ocmt.client",
            stage = "match.out",
            status = %status,
            body_len = body.len()
        );

        if !status.is_success() {
            tracing::warn!(
                target: "ocmt.client",
                status = %status,
                body = %preview_body(&body),
                "match request failed"
            );
            return Err(OcmtError::Service {
                status: status.as_u16(),
                message: service_error_message(status.as_u16(), &body),
            });
        }

        serde_json::from_str::<Value>(&body).map_err(|e| {
            tracing::warn!(
                target: "ocmt.client",
                body = %preview_body(&body),
                "response is not JSON"
            );
            OcmtError::Common(ocmt_common::Error::MalformedResponse(format!(
                "response is not valid JSON: {}",
                e
            )))
        })
    }

    /// ヘルスチェック（`status` フィールドを返す）
    pub async fn health(&self) -> Result<String> {
        let resp = self.http.get(&self.url_health).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(OcmtError::Service {
                status: status.as_u16(),
                message: service_error_message(status.as_u16(), &body),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(value
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }
}
