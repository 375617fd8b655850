use crate::domain::article::UNKNOWN_PUBLISHED;
use crate::domain::feed::Feed;
use crate::infra::api::http::HttpClient;
use crate::infra::parser::parse_channel_from_xml_str;
use anyhow::{Context, Result};
use rss::Channel;
use serde::{Deserialize, Serialize};
use tracing::warn;

// RSSフィードの<item>要素から取り出した記事候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// pubDateの文字列そのもの、無ければ"Unknown"
    pub published: String,
}

// RSSのチャンネルから<item>要素の記事候補を抽出する関数
// リンクの無いitemは取り込めないため読み飛ばす
pub fn get_feed_entries_from_channel(channel: &Channel) -> Vec<FeedEntry> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let link = item.link().map(str::trim).filter(|l| !l.is_empty());
            let Some(link) = link else {
                warn!(title = ?item.title(), "リンクの無いRSSアイテムをスキップ");
                return None;
            };

            Some(FeedEntry {
                title: item.title().unwrap_or_default().trim().to_string(),
                link: link.to_string(),
                published: item
                    .pub_date()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .unwrap_or(UNKNOWN_PUBLISHED)
                    .to_string(),
            })
        })
        .collect()
}

/// feedから記事候補のリストを取得する
pub async fn get_feed_entries_from_feed<H: HttpClient>(
    client: &H,
    feed: &Feed,
    timeout_secs: u64,
) -> Result<Vec<FeedEntry>> {
    let xml_content = client
        .fetch_text(&feed.link, timeout_secs)
        .await
        .context(format!("RSSフィードの取得に失敗: {}", feed))?;
    let channel = parse_channel_from_xml_str(&xml_content)
        .context(format!("XMLの解析に失敗: {}", feed))?;

    Ok(get_feed_entries_from_channel(&channel))
}
