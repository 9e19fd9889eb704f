//! JSON生成（共通ライブラリ）
//!
//! 平坦化した行ではなく、受信したレスポンスをそのまま整形出力する。

use crate::error::Result;
use crate::types::MatchResponse;

/// 2スペースインデントで整形したJSON
pub fn to_pretty_json(response: &MatchResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(response.raw())?)
}
