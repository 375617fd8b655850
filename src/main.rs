use anyhow::{Context, Result};
use clap::Parser;
use drregion::{
    app::{
        archive::{run_archive_pipeline, ArchiveTimeouts},
        live::run_live_pipeline,
        report::run_report,
    },
    cli::{Cli, Command},
    domain::{
        article::ArticleStore,
        feed::{load_sources, validate_snapshot_date},
    },
    infra::{api::http::ReqwestHttpClient, db::setup_database},
};
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let cli = Cli::parse();
    info!(database_url = %cli.database_url, sources = %cli.sources, "drregion 起動");

    let pool = setup_database(&cli.database_url)
        .await
        .context("データベースの準備に失敗")?;
    let store = ArticleStore::new(pool);

    match cli.command {
        Command::Live => {
            let sources = load_sources(&cli.sources)?;
            let client = ReqwestHttpClient::new();
            let summary = run_live_pipeline(&client, &store, &sources).await?;
            println!("{}", summary.display_with_domain("ライブRSS"));
        }
        Command::Archive { dates } => {
            let sources = load_sources(&cli.sources)?;
            let dates = if dates.is_empty() {
                sources.archive.dates.clone()
            } else {
                for date in &dates {
                    validate_snapshot_date(date)?;
                }
                dates
            };
            let timeouts = ArchiveTimeouts {
                index_timeout_secs: sources.http.feed_timeout_secs,
                article_timeout_secs: sources.http.article_timeout_secs,
            };
            let client = ReqwestHttpClient::new();
            let summary =
                run_archive_pipeline(&client, &store, &sources.archive, &dates, timeouts).await?;
            println!("{}", summary.display_with_domain("アーカイブ"));
        }
        Command::Report {
            json,
            reference_date,
        } => {
            run_report(&store, reference_date, json.as_deref()).await?;
        }
    }

    Ok(())
}
