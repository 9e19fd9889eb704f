//! マッチング実行のセッション状態
//!
//! 同時に処理中にできるリクエストは1件のみ。`begin` が処理中フラグを立て、
//! `complete` / `fail` が `PendingRequest` を消費して結果を丸ごと置き換える。
//! 行の部分更新は行わない。

use crate::error::{Error, Result};
use crate::normalizer::normalize;
use crate::request::{build_request, MatchInput, MatchRequest};
use crate::types::{MatchResponse, ResultRow};
use serde_json::Value;

/// リクエスト状態
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Ready,
    Failed(String),
}

/// 処理中のリクエスト（1セッションにつき同時に1つ）
#[derive(Debug)]
pub struct PendingRequest {
    request: MatchRequest,
}

impl PendingRequest {
    pub fn request(&self) -> &MatchRequest {
        &self.request
    }
}

/// セッション
#[derive(Debug, Default)]
pub struct MatchSession {
    state: RequestState,
    response: Option<MatchResponse>,
    rows: Vec<ResultRow>,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// リクエストを開始
    ///
    /// 処理中なら `RequestInFlight`。検証エラー時はセッションを変更しない。
    /// 開始時に前回の結果とエラーを消去する。
    pub fn begin(&mut self, input: &MatchInput) -> Result<PendingRequest> {
        if self.is_in_flight() {
            return Err(Error::RequestInFlight);
        }
        let request = build_request(input)?;

        self.response = None;
        self.rows.clear();
        self.state = RequestState::InFlight;

        Ok(PendingRequest { request })
    }

    /// 成功レスポンスを受け取る
    ///
    /// 形が不正なら Failed に遷移し、結果は空のまま。
    pub fn complete(&mut self, pending: PendingRequest, body: Value) -> Result<&[ResultRow]> {
        drop(pending);
        match MatchResponse::from_value(body) {
            Ok(response) => {
                self.rows = normalize(&response);
                self.response = Some(response);
                self.state = RequestState::Ready;
                Ok(&self.rows)
            }
            Err(err) => {
                self.clear_results();
                self.state = RequestState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    /// 通信/サービスエラー
    pub fn fail(&mut self, pending: PendingRequest, message: impl Into<String>) {
        drop(pending);
        self.clear_results();
        self.state = RequestState::Failed(message.into());
    }

    /// すべて初期状態に戻す
    pub fn reset(&mut self) {
        self.clear_results();
        self.state = RequestState::Idle;
    }

    /// 保存済みレスポンスを読み込む（`table` / `export` 用）
    pub fn load(&mut self, response: MatchResponse) -> Result<&[ResultRow]> {
        if self.is_in_flight() {
            return Err(Error::RequestInFlight);
        }
        self.rows = normalize(&response);
        self.response = Some(response);
        self.state = RequestState::Ready;
        Ok(&self.rows)
    }

    fn clear_results(&mut self) {
        self.response = None;
        self.rows.clear();
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == RequestState::InFlight
    }

    pub fn response(&self) -> Option<&MatchResponse> {
        self.response.as_ref()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// 直近のエラーメッセージ
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
