//! 入力ファイルの読み込み

use crate::error::{OcmtError, Result};
use ocmt_common::{FilePayload, MatchResponse};
use std::path::Path;

/// CSVファイルをアップロード用に読み込む
pub fn read_csv_payload(path: &Path) -> Result<FilePayload> {
    if !path.is_file() {
        return Err(OcmtError::FileNotFound(path.display().to_string()));
    }

    let is_csv = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        tracing::warn!(path = %path.display(), "input does not have a .csv extension");
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "input.csv".to_string());

    Ok(FilePayload::csv(file_name, bytes))
}

/// 省略可能なパスを読み込む（None はそのまま None）
pub fn read_optional_payload(path: Option<&Path>) -> Result<Option<FilePayload>> {
    path.map(read_csv_payload).transpose()
}

/// 保存済みのJSON結果を読み込む
pub fn load_response(path: &Path) -> Result<MatchResponse> {
    if !path.is_file() {
        return Err(OcmtError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(MatchResponse::from_json(&content)?)
}
