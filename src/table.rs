//! 結果テーブルの表示
//!
//! 列は `ocmt_common::columns` の定義に従う。

use ocmt_common::columns::{table_columns, ColumnSpec};
use ocmt_common::{MatchResponse, ResultRow};
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
use prettytable::{Cell, Row, Table};

/// 結果が無いときの案内
pub const EMPTY_MESSAGE: &str = "Run a match to see results.";

/// 件数・手法の1行サマリー
pub fn summary_line(response: &MatchResponse) -> String {
    let counts = response.counts();
    let method = response.run_info().method.as_str();
    format!(
        "Extractors: {} · CDS Views: {} · Method: {}",
        counts.extractors,
        counts.cds_views,
        if method.is_empty() { "-" } else { method }
    )
}

fn cell(column: &ColumnSpec, text: &str) -> Cell {
    let cell = Cell::new(text);
    if column.numeric {
        cell.style_spec("r")
    } else {
        cell.style_spec("l")
    }
}

/// 行からテーブルを組み立てる
pub fn results_table(rows: &[ResultRow]) -> Table {
    let columns = table_columns();

    let f = FormatBuilder::new()
        .column_separator(' ')
        .separators(&[LinePosition::Title], LineSeparator::new('─', '─', '─', '─'))
        .padding(1, 1)
        .build();

    let mut table = Table::init(
        rows.iter()
            .map(|row| {
                Row::new(
                    columns
                        .iter()
                        .map(|c| cell(c, &c.field.value(row).display()))
                        .collect(),
                )
            })
            .collect(),
    );
    table.set_format(f);
    table.set_titles(Row::new(
        columns
            .iter()
            .map(|c| Cell::new(c.header).style_spec(if c.numeric { "cb" } else { "lb" }))
            .collect(),
    ));
    table
}

/// サマリーとテーブルを文字列にする
pub fn render(response: Option<&MatchResponse>, rows: &[ResultRow]) -> String {
    let mut out = String::new();
    if let Some(response) = response {
        out.push_str(&summary_line(response));
        out.push('\n');
    }
    if rows.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
    } else {
        out.push('\n');
        out.push_str(&results_table(rows).to_string());
    }
    out
}
