pub mod csv;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use ocmt_common::{CsvOptions, MatchResponse, ResultRow};
use std::path::{Path, PathBuf};

/// JSON出力の既定ファイル名
pub const DEFAULT_JSON_NAME: &str = "ocmt_match_result.json";

/// CSV出力の既定ファイル名
pub const DEFAULT_CSV_NAME: &str = "ocmt_matches.csv";

/// 拡張子を強制する（違う場合は付け足す）
pub fn ensure_extension(path: &Path, extension: &str) -> PathBuf {
    let matches = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(extension))
        .unwrap_or(false);

    if matches {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

/// ディレクトリとして扱う出力先か
///
/// 既存のディレクトリに加え、末尾が区切り文字のパスやファイル名部分の無いパス
/// （`results/`、`.` など）は未作成でもディレクトリとみなす。
pub fn is_directory_target(output: &Path) -> bool {
    if output.is_dir() || output.file_name().is_none() {
        return true;
    }
    let text = output.as_os_str().to_string_lossy();
    text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR)
}

/// 出力先を解決する
///
/// ディレクトリなら既定名を結合、それ以外は拡張子を強制したファイル名として扱う。
/// 未作成のディレクトリは書き出し時に作成される。
pub fn output_path_for_format(output: &Path, default_name: &str, extension: &str) -> PathBuf {
    if is_directory_target(output) {
        output.join(default_name)
    } else {
        ensure_extension(output, extension)
    }
}

fn output_paths_for_both(output: &Path) -> (PathBuf, PathBuf) {
    if is_directory_target(output) {
        (output.join(DEFAULT_JSON_NAME), output.join(DEFAULT_CSV_NAME))
    } else {
        let known = output
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("json") || s.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let base = if known {
            output.with_extension("")
        } else {
            output.to_path_buf()
        };
        (ensure_extension(&base, "json"), ensure_extension(&base, "csv"))
    }
}

/// 結果をファイルに出力し、書き出したパスを返す
///
/// レスポンスや行が空の形式は何もしない（エラーにもしない）。
pub fn export_results(
    response: Option<&MatchResponse>,
    rows: &[ResultRow],
    format: &ExportFormat,
    output: &Path,
    csv_options: CsvOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    match format {
        ExportFormat::Json => {
            let path = output_path_for_format(output, DEFAULT_JSON_NAME, "json");
            written.extend(json::export_json(response, &path)?);
        }
        ExportFormat::Csv => {
            let path = output_path_for_format(output, DEFAULT_CSV_NAME, "csv");
            written.extend(csv::export_csv(rows, &path, csv_options)?);
        }
        ExportFormat::Both => {
            let (json_path, csv_path) = output_paths_for_both(output);
            written.extend(json::export_json(response, &json_path)?);
            written.extend(csv::export_csv(rows, &csv_path, csv_options)?);
        }
        ExportFormat::Off => {}
    }

    Ok(written)
}
