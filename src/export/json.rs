//! JSON出力
//!
//! サービスから受け取った本文をそのまま整形して書き出す。

use crate::error::Result;
use ocmt_common::{to_pretty_json, MatchResponse};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// レスポンスをJSONファイルに保存
///
/// レスポンスが無ければ何も書かずに `None` を返す。
pub fn export_json(response: Option<&MatchResponse>, path: &Path) -> Result<Option<PathBuf>> {
    let Some(response) = response else {
        tracing::debug!("no response to export as JSON");
        return Ok(None);
    };

    let content = to_pretty_json(response)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    tracing::info!(path = %path.display(), "exported JSON");
    Ok(Some(path.to_path_buf()))
}
