//! CSV生成（共通ライブラリ）
//!
//! columns.rs の列定義を使用して結果行をCSVテキストにする。
//! ヘッダー行が先頭、改行は `\r\n` で統一。クォートは必要なセルのみ。

use crate::columns::{csv_columns, ColumnSpec};
use crate::error::Result;
use crate::types::ResultRow;

/// 行区切り
pub const LINE_ENDING: &str = "\r\n";

/// CSV出力オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// shared_fields / shared_keys 列を含める
    pub include_shared: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { include_shared: true }
    }
}

fn row_record(row: &ResultRow, columns: &[&ColumnSpec]) -> Vec<String> {
    columns
        .iter()
        .map(|c| c.field.value(row).display())
        .collect()
}

/// 行配列をCSVテキストにする
///
/// 行が空なら `None`（出力なし・エラーなし）。
pub fn to_csv(rows: &[ResultRow], options: CsvOptions) -> Result<Option<String>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let columns = csv_columns(options.include_shared);
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.key))?;
    for row in rows {
        writer.write_record(row_record(row, &columns))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(Some(String::from_utf8(bytes)?))
}
