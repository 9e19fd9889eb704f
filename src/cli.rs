use clap::{Parser, Subcommand};
use ocmt_common::{RowField, SortOrder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ocmt")]
#[command(about = "Extractor → CDS View マッチング結果の取得・確認・出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// マッチングを実行して結果を表示・出力
    Match {
        /// ソース（ECC エクストラクタ）CSV
        #[arg(long)]
        source: Option<PathBuf>,

        /// ターゲット（S/4 CDS View）CSV
        #[arg(long)]
        target: Option<PathBuf>,

        /// サーバー側のサンプルデータを使用
        #[arg(long)]
        use_samples: bool,

        /// 候補数（1-5、超過分は5に丸める）
        #[arg(short = 'k', long, allow_negative_numbers = true)]
        top_k: Option<i64>,

        /// 名前類似度の重み
        #[arg(long, allow_negative_numbers = true)]
        w_name: Option<f64>,

        /// フィールド重なりの重み
        #[arg(long, allow_negative_numbers = true)]
        w_fields: Option<f64>,

        /// キー重なりの重み
        #[arg(long, allow_negative_numbers = true)]
        w_keys: Option<f64>,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/csv/both/none)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// CSVから shared_fields / shared_keys を除外
        #[arg(long)]
        no_shared: bool,

        /// 表示の並べ替え列
        #[arg(long)]
        sort: Option<RowField>,

        /// 昇順で並べ替え
        #[arg(long)]
        asc: bool,

        /// 指定IDの行の説明を表示
        #[arg(long)]
        explain: Option<String>,

        /// APIベースURL（設定・環境変数より優先）
        #[arg(long)]
        api_base: Option<String>,
    },

    /// 保存済みJSONをテーブル表示
    Table {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 並べ替え列
        #[arg(long)]
        sort: Option<RowField>,

        /// 昇順で並べ替え
        #[arg(long)]
        asc: bool,
    },

    /// 保存済みJSONからJSON/CSVを出力
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (json/csv/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// CSVから shared_fields / shared_keys を除外
        #[arg(long)]
        no_shared: bool,

        /// CSVの並べ替え列
        #[arg(long)]
        sort: Option<RowField>,

        /// 昇順で並べ替え
        #[arg(long)]
        asc: bool,
    },

    /// 1行分のスコア説明を表示
    Explain {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 行ID（省略時は対話選択）
        #[arg(long)]
        id: Option<String>,
    },

    /// サービスの稼働確認
    Health {
        /// APIベースURL
        #[arg(long)]
        api_base: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// APIベースURLを設定
        #[arg(long)]
        set_api_base: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    #[default]
    Both,
    /// 出力しない
    Off,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "both" => Ok(ExportFormat::Both),
            "none" | "off" => Ok(ExportFormat::Off),
            _ => Err(format!("Unknown format: {}. Use json, csv, both, or none", s)),
        }
    }
}

/// `--asc` フラグを並び順にする
pub fn sort_order(asc: bool) -> SortOrder {
    if asc {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_format() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("none".parse::<ExportFormat>().unwrap(), ExportFormat::Off);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_parse_match_with_negative_top_k() {
        let cli = Cli::try_parse_from(["ocmt", "match", "--use-samples", "--top-k", "-1"]).unwrap();
        match cli.command {
            Commands::Match { top_k, use_samples, .. } => {
                assert_eq!(top_k, Some(-1));
                assert!(use_samples);
            }
            _ => panic!("expected match subcommand"),
        }
    }

    #[test]
    fn test_parse_sort_column() {
        let cli = Cli::try_parse_from(["ocmt", "table", "r.json", "--sort", "cds_view", "--asc"]).unwrap();
        match cli.command {
            Commands::Table { sort, asc, .. } => {
                assert_eq!(sort, Some(RowField::Target));
                assert_eq!(sort_order(asc), SortOrder::Asc);
            }
            _ => panic!("expected table subcommand"),
        }
    }
}
