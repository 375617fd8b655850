//! DRフィード・記事ページ・Waybackスナップショットのモックサーバー
//!
//! httpmockで外部通信を遮断し、本番用の`ReqwestHttpClient`をそのまま使って
//! パイプライン全体を検証するためのもの。

use drregion::domain::feed::{ArchiveConfig, HttpConfig, SourcesConfig};
use drregion::domain::region::Region;
use httpmock::prelude::*;
use httpmock::Mock;
use std::collections::BTreeMap;

/// テストバイナリの読み込み時にログ出力を初期化
#[ctor::ctor]
fn init_test_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub struct DrMockServer {
    server: MockServer,
}

impl DrMockServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }

    /// RSSフィードを返す
    pub async fn mock_feed(&self, path: &str, items: &[(&str, &str)]) -> Mock<'_> {
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
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>DR</title><link>https://www.dr.dk</link><description>Nyheder</description>{}</channel></rss>"#,
            items
        );
        self.mock_body(path, "application/rss+xml", &body).await
    }

    /// `<article>`内に段落を持つ記事ページを返す
    pub async fn mock_article(&self, path: &str, paragraphs: &[&str]) -> Mock<'_> {
        let body = format!(
            "<html><body><header><p>DR Forside</p></header><article>{}</article></body></html>",
            paragraphs
                .iter()
                .map(|p| format!("<p>{}</p>", p))
                .collect::<String>()
        );
        self.mock_body(path, "text/html; charset=utf-8", &body).await
    }

    /// HTMLなど任意の本文を返す
    pub async fn mock_body(&self, path: &str, content_type: &str, body: &str) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .header("content-type", content_type)
                    .body(body);
            })
            .await
    }

    /// エラーステータスを返す
    pub async fn mock_status(&self, path: &str, status: u16) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(status).body("fejl");
            })
            .await
    }

    /// モックサーバーを向いたソース設定
    pub fn sources(&self, regional: &[(Region, &str)], nationwide: &str) -> SourcesConfig {
        let regional: BTreeMap<Region, String> = regional
            .iter()
            .map(|(region, path)| (*region, self.url(path)))
            .collect();
        SourcesConfig {
            regional,
            nationwide: self.url(nationwide),
            archive: ArchiveConfig {
                index_url_template: format!("{}/web/{{date}}/http://www.dr.dk/", self.server.base_url()),
                snapshot_host: self.server.base_url(),
                source_origin: "http://www.dr.dk".to_string(),
                article_delay_secs: 0,
                date_delay_secs: 0,
                dates: Vec::new(),
            },
            http: HttpConfig {
                feed_timeout_secs: 5,
                article_timeout_secs: 5,
            },
        }
    }
}
