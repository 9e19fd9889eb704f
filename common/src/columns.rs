//! 列定義
//!
//! テーブル表示とCSV出力が同じ列リストを参照するための宣言的な定義。
//! キーが `_` で始まる列は内部用で、CSVには決して出力しない。

use crate::types::ResultRow;
use std::cmp::Ordering;

/// スコア系の小数桁数（表示・CSV共通）
pub const SCORE_DECIMALS: usize = 3;

/// リスト値のセル内区切り
pub const LIST_DELIMITER: &str = ";";

/// 行のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Id,
    Source,
    Target,
    Score,
    NameScore,
    FieldOverlap,
    KeyOverlap,
    SharedFields,
    SharedKeys,
}

/// セル値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Score(f64),
    List(&'a [String]),
}

impl CellValue<'_> {
    /// 表示文字列（スコアは固定小数、リストは `;` 連結）
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.to_string(),
            CellValue::Score(v) => format_score(*v),
            CellValue::List(items) => items.join(LIST_DELIMITER),
        }
    }
}

/// スコアを固定小数で整形
pub fn format_score(value: f64) -> String {
    format!("{:.*}", SCORE_DECIMALS, value)
}

impl RowField {
    pub fn value<'a>(&self, row: &'a ResultRow) -> CellValue<'a> {
        match self {
            RowField::Id => CellValue::Text(&row.id),
            RowField::Source => CellValue::Text(&row.source),
            RowField::Target => CellValue::Text(&row.target),
            RowField::Score => CellValue::Score(row.score),
            RowField::NameScore => CellValue::Score(row.name_score),
            RowField::FieldOverlap => CellValue::Score(row.field_overlap),
            RowField::KeyOverlap => CellValue::Score(row.key_overlap),
            RowField::SharedFields => CellValue::List(&row.shared_fields),
            RowField::SharedKeys => CellValue::List(&row.shared_keys),
        }
    }

    fn compare(&self, a: &ResultRow, b: &ResultRow) -> Ordering {
        match (self.value(a), self.value(b)) {
            (CellValue::Score(x), CellValue::Score(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
            (CellValue::List(x), CellValue::List(y)) => x.join(LIST_DELIMITER).cmp(&y.join(LIST_DELIMITER)),
            _ => Ordering::Equal,
        }
    }
}

impl std::str::FromStr for RowField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if let Some(column) = COLUMNS
            .iter()
            .find(|c| c.key.trim_start_matches('_') == key || c.header.to_lowercase() == key)
        {
            return Ok(column.field);
        }
        match key.as_str() {
            "extractor" => Ok(RowField::Source),
            "cds_view" | "cds" => Ok(RowField::Target),
            _ => Err(format!(
                "Unknown column: {}. Use one of: {}",
                s,
                COLUMNS
                    .iter()
                    .map(|c| c.key.trim_start_matches('_'))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// 列の出力先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Table,
    Csv,
    Both,
}

impl Placement {
    pub fn in_table(&self) -> bool {
        matches!(self, Placement::Table | Placement::Both)
    }

    pub fn in_csv(&self) -> bool {
        matches!(self, Placement::Csv | Placement::Both)
    }
}

/// 列定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// CSVヘッダー名（`_` 始まりは内部用）
    pub key: &'static str,
    /// テーブル見出し
    pub header: &'static str,
    pub field: RowField,
    pub placement: Placement,
    /// 右寄せ（数値列）
    pub numeric: bool,
}

impl ColumnSpec {
    pub fn is_internal(&self) -> bool {
        is_internal_key(self.key)
    }

    pub fn is_list(&self) -> bool {
        matches!(self.field, RowField::SharedFields | RowField::SharedKeys)
    }
}

/// 内部用フィールド名か
pub fn is_internal_key(key: &str) -> bool {
    key.starts_with('_')
}

/// 全列
pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { key: "_id", header: "ID", field: RowField::Id, placement: Placement::Table, numeric: false },
    ColumnSpec { key: "source", header: "Extractor", field: RowField::Source, placement: Placement::Both, numeric: false },
    ColumnSpec { key: "target", header: "CDS View", field: RowField::Target, placement: Placement::Both, numeric: false },
    ColumnSpec { key: "score", header: "Score", field: RowField::Score, placement: Placement::Both, numeric: true },
    ColumnSpec { key: "name_score", header: "Name", field: RowField::NameScore, placement: Placement::Both, numeric: true },
    ColumnSpec { key: "field_overlap", header: "Fields", field: RowField::FieldOverlap, placement: Placement::Both, numeric: true },
    ColumnSpec { key: "key_overlap", header: "Keys", field: RowField::KeyOverlap, placement: Placement::Both, numeric: true },
    ColumnSpec { key: "shared_fields", header: "Shared Fields", field: RowField::SharedFields, placement: Placement::Csv, numeric: false },
    ColumnSpec { key: "shared_keys", header: "Shared Keys", field: RowField::SharedKeys, placement: Placement::Csv, numeric: false },
];

/// テーブル表示の列
pub fn table_columns() -> Vec<&'static ColumnSpec> {
    COLUMNS.iter().filter(|c| c.placement.in_table()).collect()
}

/// CSV出力の列（内部列は常に除外）
pub fn csv_columns(include_shared: bool) -> Vec<&'static ColumnSpec> {
    COLUMNS
        .iter()
        .filter(|c| c.placement.in_csv() && !c.is_internal())
        .filter(|c| include_shared || !c.is_list())
        .collect()
}

/// 並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 表示用の並べ替え（安定ソート）
///
/// 既定の score 降順の上に重ねて適用する表示層の処理。
pub fn sort_rows(rows: &mut [ResultRow], field: RowField, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = field.compare(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
