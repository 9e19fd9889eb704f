//! マッチングリクエストの組み立て
//!
//! 入力（2ファイル or サンプル指定、top_k、重み）を検証して送信可能な形にする。
//! 検証エラーはネットワーク呼び出しの前に返す。

use crate::error::{Error, Result};
use crate::types::Weights;

/// 入力モード違反時のメッセージ
pub const MISSING_INPUTS_MESSAGE: &str = "Provide both inputs or use server samples";

/// UIが提示する top_k の上限（選択肢 1..=5）
pub const MAX_TOP_K: u32 = 5;

/// 既定の top_k
pub const DEFAULT_TOP_K: u32 = 3;

/// エクストラクタ側ファイルのマルチパート名
pub const SOURCE_PART: &str = "ecc_csv";

/// CDSビュー側ファイルのマルチパート名
pub const TARGET_PART: &str = "s4_csv";

/// 表形式ファイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabularFormat {
    #[default]
    Csv,
}

impl TabularFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            TabularFormat::Csv => "text/csv",
        }
    }
}

/// アップロードするファイル
#[derive(Debug, Clone, PartialEq)]
pub struct FilePayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub format: TabularFormat,
}

impl FilePayload {
    pub fn csv(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            format: TabularFormat::Csv,
        }
    }
}

/// ユーザー入力（未検証）
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInput {
    pub source_file: Option<FilePayload>,
    pub target_file: Option<FilePayload>,
    pub use_samples: bool,
    pub top_k: i64,
    pub weights: Weights,
}

impl Default for MatchInput {
    fn default() -> Self {
        Self {
            source_file: None,
            target_file: None,
            use_samples: false,
            top_k: DEFAULT_TOP_K as i64,
            weights: Weights::SERVICE_DEFAULT,
        }
    }
}

/// 入力元
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// 2ファイルをアップロード
    Files {
        source: FilePayload,
        target: FilePayload,
    },
    /// サーバー内蔵のサンプルを使用
    Samples,
}

/// 送信可能なリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    pub mode: InputMode,
    pub top_k: u32,
    pub weights: Weights,
}

impl MatchRequest {
    /// クエリパラメータ（スカラー値）
    ///
    /// 重みは f64 の最短往復表現で書き出すため精度は失われない。
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("top_k", self.top_k.to_string()),
            ("w_name", self.weights.name.to_string()),
            ("w_fields", self.weights.fields.to_string()),
            ("w_keys", self.weights.keys.to_string()),
        ]
    }

    pub fn uses_samples(&self) -> bool {
        matches!(self.mode, InputMode::Samples)
    }
}

/// 入力を検証してリクエストを作る
///
/// - `use_samples` と「両ファイルあり」はどちらか一方のみ
/// - `top_k < 1` は拒否、`MAX_TOP_K` 超は丸める
/// - 重みは検証も正規化もせずそのまま渡す
pub fn build_request(input: &MatchInput) -> Result<MatchRequest> {
    let mode = match (input.use_samples, &input.source_file, &input.target_file) {
        (true, None, None) => InputMode::Samples,
        (false, Some(source), Some(target)) => InputMode::Files {
            source: source.clone(),
            target: target.clone(),
        },
        _ => return Err(Error::Validation(MISSING_INPUTS_MESSAGE.into())),
    };

    let top_k = clamp_top_k(input.top_k)?;

    Ok(MatchRequest {
        mode,
        top_k,
        weights: input.weights,
    })
}

/// top_k を検証（1未満はエラー、上限超は丸め）
pub fn clamp_top_k(top_k: i64) -> Result<u32> {
    if top_k < 1 {
        return Err(Error::Validation(format!(
            "top_k must be a positive integer (got {})",
            top_k
        )));
    }
    Ok(top_k.min(MAX_TOP_K as i64) as u32)
}
