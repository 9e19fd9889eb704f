//! マッチング結果の型定義
//!
//! マッチングサービスのレスポンス（snake_case のワイヤ形式）と、
//! それを平坦化した行 `ResultRow`:
//! - MatchResponse: サービスから受け取った生JSON + 型付きビュー
//! - Match / Candidate / Explanation: レスポンスの入れ子構造
//! - ResultRow: (Match, Candidate) ごとの1行。テーブル・CSVの唯一の情報源

use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// null を既定値として扱う
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 数値フィールド: 欠損・null は 0、数値文字列は解釈する
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numberish {
        Number(f64),
        Text(String),
    }

    match Option::<Numberish>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Numberish::Number(v)) => Ok(v),
        Some(Numberish::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected a number, got {:?}", text)))
        }
    }
}

/// 3軸の重み（name / fields / keys）
///
/// リクエストでは生の値をそのまま送る。合計1.0への正規化はサービス側の責務で、
/// レスポンスの `run_info.weights` に正規化後の値が返る。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub name: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fields: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub keys: f64,
}

impl Weights {
    /// サービスの既定値
    pub const SERVICE_DEFAULT: Weights = Weights {
        name: 0.6,
        fields: 0.3,
        keys: 0.1,
    };

    pub fn new(name: f64, fields: f64, keys: f64) -> Self {
        Self { name, fields, keys }
    }

    /// 表示用の合計値。リクエストやスコア計算には使わない
    pub fn sum(&self) -> f64 {
        self.name + self.fields + self.keys
    }
}

/// スコア内訳（重み適用後の各成分）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreParts {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub name: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fields: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub keys: f64,
}

/// 対象件数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub extractors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cds_views: u64,
}

/// 実行設定のエコー（表示専用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_k: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weights: Weights,
}

/// 重なり件数の内訳
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlapDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared: Vec<String>,
    #[serde(default, alias = "source_total", deserialize_with = "null_as_default")]
    pub extractor_total: u64,
    #[serde(default, alias = "target_total", deserialize_with = "null_as_default")]
    pub cds_total: u64,
}

/// 候補ごとのスコア説明
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub weights: Weights,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score_parts: ScoreParts,
    #[serde(default, alias = "name_terms", deserialize_with = "null_as_default")]
    pub matched_name_terms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_overlap: OverlapDetail,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_overlap: OverlapDetail,
}

/// CDSビュー候補
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cds_view_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cds_view_text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub name_score: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub field_overlap: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub key_overlap: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_name_terms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_fields: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_keys: Vec<String>,
    #[serde(default)]
    pub explain: Option<Explanation>,
}

/// エクストラクタ1件と、その候補リスト
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, deserialize_with = "null_as_default")]
    pub extractor_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extractor_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ResponseBody {
    #[serde(default, deserialize_with = "null_as_default")]
    run_info: RunInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    counts: Counts,
    matches: Vec<Match>,
}

/// サービスのレスポンス
///
/// 受信した JSON をそのまま保持し（JSON出力で完全に再現するため）、
/// 型付きのビューはそこから読み取る。生成後は不変。
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResponse {
    raw: Value,
    body: ResponseBody,
}

impl MatchResponse {
    /// JSON値から生成。形が許容範囲を超えていれば MalformedResponse
    pub fn from_value(raw: Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(Error::MalformedResponse(
                "response body is not a JSON object".into(),
            ));
        }
        let body = ResponseBody::deserialize(&raw)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Ok(Self { raw, body })
    }

    /// JSON文字列から生成
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text)
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {}", e)))?;
        Self::from_value(raw)
    }

    /// 受信したままの JSON
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    pub fn run_info(&self) -> &RunInfo {
        &self.body.run_info
    }

    pub fn counts(&self) -> &Counts {
        &self.body.counts
    }

    pub fn matches(&self) -> &[Match] {
        &self.body.matches
    }
}

impl Serialize for MatchResponse {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// 平坦化した結果行
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// `source::target::position`
    pub id: String,
    /// 平坦化時の出力位置（ソート前）
    pub position: usize,
    pub match_index: usize,
    pub candidate_index: usize,
    pub source: String,
    pub source_text: String,
    pub target: String,
    pub target_text: String,
    pub score: f64,
    pub name_score: f64,
    pub field_overlap: f64,
    pub key_overlap: f64,
    pub matched_name_terms: Vec<String>,
    pub shared_fields: Vec<String>,
    pub shared_keys: Vec<String>,
    pub explain: Option<Explanation>,
}
