use anyhow::Context;
use clap::Parser;
use ocmt_common::columns::sort_rows;
use ocmt_common::{CsvOptions, MatchInput, MatchSession, ResultRow, Weights};
use ocmt_match::{cli, client, config, error, explain, export, inputs, runner, table};
use cli::{sort_order, Cli, Commands, ExportFormat};
use config::Config;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let message = match err.downcast_ref::<error::OcmtError>() {
            Some(e) => e.banner_message(),
            None => format!("{:#}", err),
        };
        eprintln!("✖ {}", message);
        std::process::exit(1);
    }
}

/// `RUST_LOG` が無ければ warn（-v で debug）
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_sort(rows: &[ResultRow], sort: Option<ocmt_common::RowField>, asc: bool) -> Vec<ResultRow> {
    let mut rows = rows.to_vec();
    if let Some(field) = sort {
        sort_rows(&mut rows, field, sort_order(asc));
    }
    rows
}

fn print_written(paths: &[PathBuf]) {
    if paths.is_empty() {
        println!("- 出力する結果がありません");
    }
    for path in paths {
        println!("✔ 出力: {}", path.display());
    }
}

fn make_client(config: &Config, api_base: Option<&str>) -> anyhow::Result<client::MatchClient> {
    let base = config.effective_api_base(api_base);
    let timeout = config.timeout_seconds.map(Duration::from_secs);
    tracing::debug!(api_base = %base, ?timeout, "using matching service");
    client::MatchClient::new(&base, timeout).context("HTTPクライアントの初期化に失敗しました")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Match {
            source,
            target,
            use_samples,
            top_k,
            w_name,
            w_fields,
            w_keys,
            output,
            format,
            no_shared,
            sort,
            asc,
            explain: explain_id,
            api_base,
        } => {
            println!("🔎 ocmt - マッチング\n");

            let defaults = config.default_weights;
            let weights = Weights::new(
                w_name.unwrap_or(defaults.name),
                w_fields.unwrap_or(defaults.fields),
                w_keys.unwrap_or(defaults.keys),
            );
            let input = MatchInput {
                source_file: inputs::read_optional_payload(source.as_deref())?,
                target_file: inputs::read_optional_payload(target.as_deref())?,
                use_samples,
                top_k: top_k.unwrap_or(i64::from(config.default_top_k)),
                weights,
            };

            println!(
                "重み: name {} / fields {} / keys {} (合計 {})",
                weights.name,
                weights.fields,
                weights.keys,
                weights.sum()
            );
            println!("(API normalizes these so the final weights sum to 1.0.)\n");

            let client = make_client(&config, api_base.as_deref())?;
            let mut session = MatchSession::new();
            let rows = runner::run_match(&client, &mut session, &input, !cli.verbose).await?;
            let rows = apply_sort(rows, sort, asc);

            print!("{}", table::render(session.response(), &rows));

            if let Some(id) = explain_id {
                let view = explain::explain_row(&rows, Some(&id))?;
                println!("\n{}", view);
            }

            if format != ExportFormat::Off {
                println!();
                let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
                let written = export::export_results(
                    session.response(),
                    &rows,
                    &format,
                    &output_dir,
                    CsvOptions { include_shared: !no_shared },
                )?;
                print_written(&written);
            }

            println!("\n✅ 完了");
        }

        Commands::Table { input, sort, asc } => {
            let response = inputs::load_response(&input)
                .with_context(|| format!("{} の読み込みに失敗しました", input.display()))?;
            let mut session = MatchSession::new();
            let rows = session.load(response)?;
            let rows = apply_sort(rows, sort, asc);
            print!("{}", table::render(session.response(), &rows));
        }

        Commands::Export { input, format, output, no_shared, sort, asc } => {
            println!("📄 ocmt - エクスポート\n");

            let response = inputs::load_response(&input)
                .with_context(|| format!("{} の読み込みに失敗しました", input.display()))?;
            let mut session = MatchSession::new();
            let rows = session.load(response)?;
            let rows = apply_sort(rows, sort, asc);

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let written = export::export_results(
                session.response(),
                &rows,
                &format,
                &output_dir,
                CsvOptions { include_shared: !no_shared },
            )?;
            print_written(&written);

            println!("\n✅ エクスポート完了");
        }

        Commands::Explain { input, id } => {
            let response = inputs::load_response(&input)
                .with_context(|| format!("{} の読み込みに失敗しました", input.display()))?;
            let mut session = MatchSession::new();
            let rows = session.load(response)?;
            let view = explain::explain_row(rows, id.as_deref())?;
            println!("{}", view);
        }

        Commands::Health { api_base } => {
            let client = make_client(&config, api_base.as_deref())?;
            let status = client.health().await?;
            println!("✔ {}: {}", config.effective_api_base(api_base.as_deref()), status);
        }

        Commands::Config { set_api_base, show } => {
            let mut config = config;

            if let Some(base) = set_api_base {
                config.set_api_base(base)?;
                println!("✔ APIベースURLを設定しました");
            }

            if show {
                let w = config.default_weights;
                println!("設定:");
                println!("  APIベースURL: {}", config.api_base);
                println!("  実際のURL: {}", config.effective_api_base(None));
                println!("  候補数: {}", config.default_top_k);
                println!("  重み: name {} / fields {} / keys {}", w.name, w.fields, w.keys);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
            }
        }
    }

    Ok(())
}
