use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcmtError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// サービスが非2xxを返した（message は表示用に抽出済み）
    #[error("サービスエラー (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("通信エラー: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("行が見つかりません: {0}")]
    RowNotFound(String),

    #[error("表示できる結果がありません")]
    NoResults,

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] ocmt_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl OcmtError {
    /// エラーバナーに出す1行メッセージ
    pub fn banner_message(&self) -> String {
        match self {
            OcmtError::Service { message, .. } => message.clone(),
            OcmtError::Common(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OcmtError>;
