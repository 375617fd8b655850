use crate::{
    app::ingest::{ingest_candidate, Candidate, IngestTarget, RegionStrategy},
    domain::{
        archive::{canonicalize_snapshot_link, extract_teasers, snapshot_fetch_url, Teaser},
        article::{ArticleStore, Collection, SourceTag},
        feed::ArchiveConfig,
    },
    infra::api::http::HttpClient,
    types::IngestSummary,
};
use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tracing::{error, info, warn};

/// アーカイブ取り込みのタイムアウト設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveTimeouts {
    pub index_timeout_secs: u64,
    pub article_timeout_secs: u64,
}

/// アーカイブ（Waybackスナップショット）取り込みのメイン実行関数
///
/// 日付ごとにインデックスページを取得し、ティーザーの記事を分類して保存する。
/// インデックスの取得・解析エラーは記録して次の日付へ進む。
/// 記事取得の間と日付の間には設定された待ち時間を入れる。
pub async fn run_archive_pipeline<H: HttpClient>(
    client: &H,
    store: &ArticleStore,
    archive: &ArchiveConfig,
    dates: &[String],
    timeouts: ArchiveTimeouts,
) -> Result<IngestSummary> {
    info!("=== アーカイブ取り込み開始: {}日分 ===", dates.len());
    let mut summary = IngestSummary::empty();

    for (i, date) in dates.iter().enumerate() {
        info!(date = %date, "スナップショット処理中");

        match load_snapshot_teasers(client, archive, date, timeouts.index_timeout_secs).await {
            Ok(teasers) => {
                info!("  {}件のティーザーを抽出", teasers.len());
                let date_summary =
                    ingest_teasers(client, store, archive, date, teasers, timeouts).await?;
                info!("  {}", date_summary.display_with_domain(date));
                summary.merge(&date_summary);
            }
            Err(e) => {
                error!(date = %date, error = %format!("{:#}", e), "インデックス取得エラー");
                summary.failed_sources += 1;
            }
        }

        if i + 1 < dates.len() {
            pause(archive.date_delay()).await;
        }
    }

    info!(%summary, "=== アーカイブ取り込み完了 ===");
    Ok(summary)
}

/// スナップショットのインデックスページからティーザーを取得する
///
/// ティーザーが一件も見つからないページは解析失敗として扱う。
async fn load_snapshot_teasers<H: HttpClient>(
    client: &H,
    archive: &ArchiveConfig,
    date: &str,
    timeout_secs: u64,
) -> Result<Vec<Teaser>> {
    let index_url = archive.index_url(date);
    let html = client
        .fetch_text(&index_url, timeout_secs)
        .await
        .context(format!("インデックスページの取得に失敗: {}", index_url))?;

    let teasers = extract_teasers(&html);
    if teasers.is_empty() {
        return Err(anyhow!("ティーザーが見つかりません: {}", index_url));
    }
    Ok(teasers)
}

/// ティーザーの記事を順に取り込む
async fn ingest_teasers<H: HttpClient>(
    client: &H,
    store: &ArticleStore,
    archive: &ArchiveConfig,
    date: &str,
    teasers: Vec<Teaser>,
    timeouts: ArchiveTimeouts,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::empty();
    let target = IngestTarget {
        collection: Collection::Archived,
        source: SourceTag::Dr,
        article_timeout_secs: timeouts.article_timeout_secs,
    };

    for teaser in teasers {
        let urls = canonicalize_snapshot_link(&teaser.href, &archive.source_origin).and_then(
            |link| Ok((link, snapshot_fetch_url(&teaser.href, &archive.snapshot_host)?)),
        );
        let (link, text_url) = match urls {
            Ok(urls) => urls,
            Err(e) => {
                warn!(href = %teaser.href, error = %e, "ティーザーのリンクを解釈できません");
                continue;
            }
        };

        let strategy = RegionStrategy::Classify { text_url };
        let candidate = Candidate {
            title: teaser.title,
            link,
            published: date.to_string(),
            strategy: strategy.clone(),
        };

        let outcome = ingest_candidate(client, store, candidate, target).await?;
        outcome.record(&mut summary);

        if outcome.fetched(&strategy) {
            pause(archive.article_delay()).await;
        }
    }

    Ok(summary)
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
