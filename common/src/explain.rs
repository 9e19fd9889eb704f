//! スコア説明ビュー
//!
//! 1行分の `explain` ブロックを表示用の構造にする。
//! explain が無い場合は明示的に「説明なし」状態を返し、空のパネルにはしない。
//! 空リストはすべて `None` マーカーとして扱い、読み込み中/エラーと区別できるようにする。

use crate::columns::format_score;
use crate::types::{OverlapDetail, ResultRow, ScoreParts, Weights};
use std::fmt;

/// 説明なしの表示文言
pub const NO_EXPLANATION: &str = "No explanation available.";

/// 空リストの表示マーカー
pub const NONE_MARKER: &str = "None";

/// リスト表示（空なら None マーカー）
#[derive(Debug, Clone, PartialEq)]
pub enum ListDisplay {
    None,
    Items(Vec<String>),
}

impl ListDisplay {
    pub fn from_items(items: &[String]) -> Self {
        if items.is_empty() {
            ListDisplay::None
        } else {
            ListDisplay::Items(items.to_vec())
        }
    }
}

impl fmt::Display for ListDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListDisplay::None => write!(f, "{}", NONE_MARKER),
            ListDisplay::Items(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

/// 重なり件数の表示
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapView {
    pub shared_count: usize,
    pub source_total: u64,
    pub target_total: u64,
    pub shared: ListDisplay,
}

impl OverlapView {
    fn from_detail(detail: &OverlapDetail) -> Self {
        Self {
            shared_count: detail.shared.len(),
            source_total: detail.extractor_total,
            target_total: detail.cds_total,
            shared: ListDisplay::from_items(&detail.shared),
        }
    }
}

/// 行の総合スコア群
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowScores {
    pub score: f64,
    pub name_score: f64,
    pub field_overlap: f64,
    pub key_overlap: f64,
}

/// 説明パネル
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainPanel {
    pub weights: Weights,
    pub score_parts: ScoreParts,
    pub scores: RowScores,
    pub name_terms: ListDisplay,
    pub field_overlap: OverlapView,
    pub key_overlap: OverlapView,
}

/// 説明ビュー
#[derive(Debug, Clone, PartialEq)]
pub enum ExplainView {
    Unavailable { source: String, target: String },
    Panel { source: String, target: String, panel: ExplainPanel },
}

impl ExplainView {
    pub fn from_row(row: &ResultRow) -> Self {
        let source = row.source.clone();
        let target = row.target.clone();

        let Some(explain) = row.explain.as_ref() else {
            return ExplainView::Unavailable { source, target };
        };

        let panel = ExplainPanel {
            weights: explain.weights,
            score_parts: explain.score_parts,
            scores: RowScores {
                score: row.score,
                name_score: row.name_score,
                field_overlap: row.field_overlap,
                key_overlap: row.key_overlap,
            },
            name_terms: ListDisplay::from_items(&explain.matched_name_terms),
            field_overlap: OverlapView::from_detail(&explain.field_overlap),
            key_overlap: OverlapView::from_detail(&explain.key_overlap),
        };

        ExplainView::Panel { source, target, panel }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ExplainView::Panel { .. })
    }
}

impl fmt::Display for ExplainView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplainView::Unavailable { source, target } => {
                writeln!(f, "Why this match? ({} → {})", source, target)?;
                write!(f, "  {}", NO_EXPLANATION)
            }
            ExplainView::Panel { source, target, panel } => {
                let w = &panel.weights;
                let p = &panel.score_parts;
                let s = &panel.scores;
                writeln!(f, "Why this match? ({} → {})", source, target)?;
                writeln!(f)?;
                writeln!(f, "Score breakdown")?;
                writeln!(
                    f,
                    "  Weights: name {:.2}, fields {:.2}, keys {:.2}",
                    w.name, w.fields, w.keys
                )?;
                writeln!(
                    f,
                    "  Parts:   name {}, fields {}, keys {}",
                    format_score(p.name),
                    format_score(p.fields),
                    format_score(p.keys)
                )?;
                writeln!(f, "  Overall score:   {}", format_score(s.score))?;
                writeln!(f, "  Name similarity: {}", format_score(s.name_score))?;
                writeln!(f, "  Field overlap:   {}", format_score(s.field_overlap))?;
                writeln!(f, "  Key overlap:     {}", format_score(s.key_overlap))?;
                writeln!(f)?;
                writeln!(f, "Matched name terms")?;
                writeln!(f, "  {}", panel.name_terms)?;
                writeln!(f)?;
                write_overlap(f, "Field overlap", &panel.field_overlap)?;
                writeln!(f)?;
                write_overlap(f, "Key overlap", &panel.key_overlap)
            }
        }
    }
}

fn write_overlap(f: &mut fmt::Formatter<'_>, title: &str, overlap: &OverlapView) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(
        f,
        "  Shared ({}) of extractor {} vs CDS {}",
        overlap.shared_count, overlap.source_total, overlap.target_total
    )?;
    write!(f, "  {}", overlap.shared)
}
