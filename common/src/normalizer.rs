//! 結果の平坦化
//!
//! `MatchResponse` の入れ子（エクストラクタ → 候補）を `ResultRow` の配列にする。
//!
//! ## 処理フロー
//! 1. matches をレスポンス順に、各 candidates もレスポンス順に走査
//! 2. 候補1件につき1行（explain・共有フィールド/キーはそのまま引き継ぐ）
//! 3. score の降順で安定ソート（同点は出力順を維持）

use crate::types::{MatchResponse, ResultRow};
use std::cmp::Ordering;

/// 行IDを組み立てる
///
/// 同じエクストラクタに同名候補が複数あっても衝突しないよう出力位置を含める。
pub fn row_id(source: &str, target: &str, position: usize) -> String {
    format!("{}::{}::{}", source, target, position)
}

/// レスポンスを行配列に平坦化する（score 降順）
pub fn normalize(response: &MatchResponse) -> Vec<ResultRow> {
    let mut rows = flatten(response);
    sort_by_score_desc(&mut rows);
    rows
}

/// ソートなしの平坦化（レスポンス順）
pub fn flatten(response: &MatchResponse) -> Vec<ResultRow> {
    let mut rows = Vec::new();

    for (match_index, m) in response.matches().iter().enumerate() {
        for (candidate_index, c) in m.candidates.iter().enumerate() {
            let position = rows.len();
            rows.push(ResultRow {
                id: row_id(&m.extractor_name, &c.cds_view_name, position),
                position,
                match_index,
                candidate_index,
                source: m.extractor_name.clone(),
                source_text: m.extractor_text.clone(),
                target: c.cds_view_name.clone(),
                target_text: c.cds_view_text.clone(),
                score: c.score,
                name_score: c.name_score,
                field_overlap: c.field_overlap,
                key_overlap: c.key_overlap,
                matched_name_terms: c.matched_name_terms.clone(),
                shared_fields: c.shared_fields.clone(),
                shared_keys: c.shared_keys.clone(),
                explain: c.explain.clone(),
            });
        }
    }

    rows
}

/// score 降順の安定ソート（NaN は末尾）
pub fn sort_by_score_desc(rows: &mut [ResultRow]) {
    rows.sort_by(|a, b| compare_score_desc(a.score, b.score));
}

fn compare_score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
