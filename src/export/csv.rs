//! CSV出力

use crate::error::Result;
use ocmt_common::{to_csv, CsvOptions, ResultRow};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 結果行をCSVファイルに保存
///
/// 行が空なら何も書かずに `None` を返す。
pub fn export_csv(rows: &[ResultRow], path: &Path, options: CsvOptions) -> Result<Option<PathBuf>> {
    let Some(content) = to_csv(rows, options)? else {
        tracing::debug!("no rows to export as CSV");
        return Ok(None);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = rows.len(), "exported CSV");
    Ok(Some(path.to_path_buf()))
}
