//! マッチング実行
//!
//! 検証 → 送信 → 正規化 の流れをセッション経由で行う。
//! 検証エラーの場合はリクエストを送らない。

use crate::client::MatchClient;
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ocmt_common::{MatchInput, MatchSession, ResultRow};
use std::time::Duration;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 1回分のマッチングを実行し、正規化済みの行を返す
///
/// 失敗時はセッションを Failed にし、結果を空にしたうえでエラーを返す。
pub async fn run_match<'s>(
    client: &MatchClient,
    session: &'s mut MatchSession,
    input: &MatchInput,
    show_progress: bool,
) -> Result<&'s [ResultRow]> {
    let pending = session.begin(input)?;

    let pb = show_progress.then(|| spinner("Matching..."));
    let outcome = client.post_match(pending.request()).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match outcome {
        Ok(body) => Ok(session.complete(pending, body)?),
        Err(err) => {
            tracing::warn!(error = %err, "match request failed");
            session.fail(pending, err.banner_message());
            Err(err)
        }
    }
}
