use crate::{
    app::ingest::{ingest_candidate, Candidate, IngestTarget, RegionStrategy},
    domain::{
        article::{ArticleStore, Collection, SourceTag},
        feed::{Feed, SourcesConfig},
        rss::get_feed_entries_from_feed,
    },
    infra::api::http::HttpClient,
    types::IngestSummary,
};
use anyhow::Result;
use tracing::{error, info};

/// ライブRSS取り込みのメイン実行関数（依存性を注入）
///
/// 1. 地域別フィードを宣言順に処理（地域はフィードで確定）
/// 2. 全国フィードを処理（記事本文から地域を分類）
///
/// フィード単位の取得・解析エラーは記録して次のフィードへ進む。
pub async fn run_live_pipeline<H: HttpClient>(
    client: &H,
    store: &ArticleStore,
    config: &SourcesConfig,
) -> Result<IngestSummary> {
    info!("=== ライブRSS取り込み開始 ===");
    let mut summary = IngestSummary::empty();

    for feed in config.regional_feeds() {
        let feed_summary = process_feed(client, store, config, &feed, SourceTag::Regional).await?;
        summary.merge(&feed_summary);
    }

    let nationwide = config.nationwide_feed();
    let feed_summary = process_feed(client, store, config, &nationwide, SourceTag::Indland).await?;
    summary.merge(&feed_summary);

    info!(%summary, "=== ライブRSS取り込み完了 ===");
    Ok(summary)
}

/// 一つのフィードを取り込む
///
/// 地域が決まっているフィードは`Fixed`、そうでなければリンク先の本文で分類する。
async fn process_feed<H: HttpClient>(
    client: &H,
    store: &ArticleStore,
    config: &SourcesConfig,
    feed: &Feed,
    source: SourceTag,
) -> Result<IngestSummary> {
    info!(feed = %feed, "フィード処理中");
    let mut summary = IngestSummary::empty();

    let entries =
        match get_feed_entries_from_feed(client, feed, config.http.feed_timeout_secs).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(feed = %feed, error = %format!("{:#}", e), "フィード取得エラー");
                summary.failed_sources += 1;
                return Ok(summary);
            }
        };
    info!("  {}件のエントリを抽出", entries.len());

    let target = IngestTarget {
        collection: Collection::Current,
        source,
        article_timeout_secs: config.http.article_timeout_secs,
    };

    for entry in entries {
        let strategy = match feed.region {
            Some(region) => RegionStrategy::Fixed(region),
            None => RegionStrategy::Classify {
                text_url: entry.link.clone(),
            },
        };
        let candidate = Candidate {
            title: entry.title,
            link: entry.link,
            published: entry.published,
            strategy,
        };

        let outcome = ingest_candidate(client, store, candidate, target).await?;
        outcome.record(&mut summary);
    }

    info!("  {}", summary.display_with_domain(&feed.name));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feed::{ArchiveConfig, HttpConfig};
    use crate::domain::region::Region;
    use crate::infra::api::http::MockHttpClient;
    use crate::infra::db::setup_memory_database;
    use std::collections::BTreeMap;

    const FYN_FEED: &str = "http://feeds.test/fyn";
    const BORNHOLM_FEED: &str = "http://feeds.test/bornholm";
    const INDLAND_FEED: &str = "http://feeds.test/indland";

    async fn memory_store() -> ArticleStore {
        ArticleStore::new(
            setup_memory_database()
                .await
                .expect("インメモリDBの準備に失敗"),
        )
    }

    fn test_config() -> SourcesConfig {
        let mut regional = BTreeMap::new();
        regional.insert(Region::Bornholm, BORNHOLM_FEED.to_string());
        regional.insert(Region::Fyn, FYN_FEED.to_string());
        SourcesConfig {
            regional,
            nationwide: INDLAND_FEED.to_string(),
            archive: ArchiveConfig {
                index_url_template: "http://archive.test/web/{date}/http://www.dr.dk/"
                    .to_string(),
                snapshot_host: "http://archive.test".to_string(),
                source_origin: "http://www.dr.dk".to_string(),
                article_delay_secs: 0,
                date_delay_secs: 0,
                dates: Vec::new(),
            },
            http: HttpConfig::default(),
        }
    }

    fn rss(items: &[(&str, &str)]) -> String {
        let items: String = items
            .iter()
            .map(|(title, link)| {
                format!(
                    "<item><title>{}</title><link>{}</link>\
                     <pubDate>Wed, 15 Jan 2025 10:00:00 +0100</pubDate></item>",
                    title, link
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>t</title>{}</channel></rss>"#,
            items
        )
    }

    fn article_html(body: &str) -> String {
        format!("<html><body><article><p>{}</p></article></body></html>", body)
    }

    #[tokio::test]
    async fn test_live_pipeline_with_mock() -> Result<()> {
        let store = memory_store().await;
        let client = MockHttpClient::new()
            .with_response(FYN_FEED, &rss(&[("A1", " http://x/a1 ")]))
            .with_response(BORNHOLM_FEED, &rss(&[("B1", "http://x/b1")]))
            .with_response(INDLAND_FEED, &rss(&[("N1", "http://x/n1"), ("N2", "http://x/n2")]))
            .with_response(
                "http://x/n1",
                &article_html("Aarhus, Randers og Horsens får ny letbane. Odense venter."),
            )
            .with_error("http://x/n2", "503 Service Unavailable");

        let summary = run_live_pipeline(&client, &store, &test_config()).await?;

        assert_eq!(summary.inserted, 4);
        assert_eq!(summary.unknown_region, 1);
        assert_eq!(summary.failed_sources, 0);

        let a1 = store.find(Collection::Current, "http://x/a1").await?.unwrap();
        assert_eq!(a1.region, "Fyn");
        assert_eq!(a1.source, "Regional");
        assert_eq!(a1.published, "Wed, 15 Jan 2025 10:00:00 +0100");
        assert_eq!(client.request_count("http://x/a1"), 0, "地域別記事の本文は取得しない");

        let n1 = store.find(Collection::Current, "http://x/n1").await?.unwrap();
        assert_eq!(n1.region, "Østjylland");
        assert_eq!(n1.source, "Indland");

        let n2 = store.find(Collection::Current, "http://x/n2").await?.unwrap();
        assert_eq!(n2.region, "Unknown");

        // 地域別フィードは宣言順（Bornholm → Fyn）、全国フィードは最後
        let order: Vec<String> = client
            .requested_urls()
            .into_iter()
            .filter(|u| u.starts_with("http://feeds.test"))
            .collect();
        assert_eq!(order, vec![BORNHOLM_FEED, FYN_FEED, INDLAND_FEED]);

        println!("✅ ライブ取り込みテスト完了");
        Ok(())
    }

    #[tokio::test]
    async fn test_broken_feed_does_not_stop_run() -> Result<()> {
        let store = memory_store().await;
        let client = MockHttpClient::new()
            .with_error(BORNHOLM_FEED, "connection refused")
            .with_response(FYN_FEED, "<html><body>ikke rss</body></html>")
            .with_response(INDLAND_FEED, &rss(&[("N1", "http://x/n1")]))
            .with_response("http://x/n1", &article_html("Storm over Rønne og Nexø"));

        let summary = run_live_pipeline(&client, &store, &test_config()).await?;

        assert_eq!(summary.failed_sources, 2);
        assert_eq!(summary.inserted, 1);
        let n1 = store.find(Collection::Current, "http://x/n1").await?.unwrap();
        assert_eq!(n1.region, "Bornholm");
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate() -> Result<()> {
        let store = memory_store().await;
        let client = MockHttpClient::new()
            .with_response(FYN_FEED, &rss(&[("A1", "http://x/a1")]))
            .with_response(BORNHOLM_FEED, &rss(&[]))
            .with_response(INDLAND_FEED, &rss(&[("N1", "http://x/n1")]))
            .with_response("http://x/n1", &article_html("Aalborg"));

        let first = run_live_pipeline(&client, &store, &test_config()).await?;
        let second = run_live_pipeline(&client, &store, &test_config()).await?;

        assert_eq!(first.inserted, 2);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped_duplicate, 2);
        assert_eq!(store.count(Collection::Current).await?, 2);
        assert_eq!(client.request_count("http://x/n1"), 1, "保存済み記事は再取得しない");
        Ok(())
    }
}
