//! OCMT Common Library
//!
//! CLIとその他フロントエンドで共有される型と処理:
//! リクエスト組み立て、結果の平坦化、列定義、CSV/JSON生成、説明ビュー、セッション状態

pub mod types;
pub mod error;
pub mod request;
pub mod normalizer;
pub mod columns;
pub mod export;
pub mod explain;
pub mod session;

pub use types::{
    Candidate, Counts, Explanation, Match, MatchResponse, OverlapDetail, ResultRow, RunInfo,
    ScoreParts, Weights,
};
pub use error::{Error, Result};
pub use request::{build_request, FilePayload, InputMode, MatchInput, MatchRequest};
pub use normalizer::normalize;
pub use columns::{ColumnSpec, RowField, SortOrder, COLUMNS};
pub use export::{to_csv, to_pretty_json, CsvOptions};
pub use explain::ExplainView;
pub use session::{MatchSession, PendingRequest, RequestState};
