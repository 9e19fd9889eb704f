//! 行ごとのスコア説明
//!
//! ID 指定、または対話的な選択で1行を選び、説明パネルを表示する。

use crate::error::{OcmtError, Result};
use dialoguer::Select;
use ocmt_common::{ExplainView, ResultRow};

/// ID で行を選ぶ
pub fn find_row<'a>(rows: &'a [ResultRow], id: &str) -> Result<&'a ResultRow> {
    rows.iter()
        .find(|r| r.id == id.trim())
        .ok_or_else(|| OcmtError::RowNotFound(id.to_string()))
}

fn picker_label(row: &ResultRow) -> String {
    format!(
        "{} → {}  ({})",
        row.source,
        row.target,
        ocmt_common::columns::format_score(row.score)
    )
}

/// 対話的に行を選ぶ
pub fn pick_row(rows: &[ResultRow]) -> Result<&ResultRow> {
    if rows.is_empty() {
        return Err(OcmtError::NoResults);
    }

    let labels: Vec<String> = rows.iter().map(picker_label).collect();
    let index = Select::new()
        .with_prompt("Explain which match?")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| OcmtError::Prompt(e.to_string()))?;

    Ok(&rows[index])
}

/// 説明ビューを組み立てる（id が無ければ対話選択）
pub fn explain_row(rows: &[ResultRow], id: Option<&str>) -> Result<ExplainView> {
    let row = match id {
        Some(id) => find_row(rows, id)?,
        None => pick_row(rows)?,
    };
    Ok(ExplainView::from_row(row))
}
