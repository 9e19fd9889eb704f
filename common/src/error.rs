//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 送信前の入力チェックで検出（リクエストは送られない）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 成功レスポンスだが MatchResponse の形を満たさない
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// 既にリクエストが処理中
    #[error("A match request is already in flight")]
    RequestInFlight,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// バナー表示用のメッセージ（種別プレフィックスなし）
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::MalformedResponse(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
