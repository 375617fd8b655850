//! Waybackスナップショットのインデックス解析とURL正規化

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::borrow::Cow;
use url::Url;

static TEASER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.dre-article-teaser").expect("固定セレクタ teaser"));
static TEASER_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.dre-teaser-title").expect("固定セレクタ teaser title"));

/// インデックスページから抽出した記事ティーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teaser {
    pub title: String,
    /// スナップショット相対のリンク（`/web/<timestamp>/<元URL>`）
    pub href: String,
}

/// インデックスページのHTMLから記事ティーザーを抽出する
///
/// タイトルリンクを持たないティーザーは読み飛ばす。
pub fn extract_teasers(html: &str) -> Vec<Teaser> {
    let document = Html::parse_document(html);

    document
        .select(&TEASER_SELECTOR)
        .filter_map(|teaser| {
            let anchor = teaser.select(&TEASER_TITLE_SELECTOR).next()?;
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let title = anchor
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            Some(Teaser {
                title,
                href: href.to_string(),
            })
        })
        .collect()
}

/// スナップショットリンクから元URL部分を取り出す
///
/// `/web/<timestamp>[修飾子]/<元URL>`、またはその前にアーカイブのホストが付いた形に対応する。
fn snapshot_original(link: &str) -> Option<&str> {
    let path = if link.starts_with('/') {
        link
    } else {
        let after_scheme = link
            .strip_prefix("https://")
            .or_else(|| link.strip_prefix("http://"))?;
        let slash = after_scheme.find('/')?;
        let (host, path) = after_scheme.split_at(slash);
        if !host.ends_with("archive.org") {
            return None;
        }
        path
    };

    let rest = path.strip_prefix("/web/")?;
    let (timestamp, original) = rest.split_once('/')?;
    if !timestamp.starts_with(|c: char| c.is_ascii_digit()) || original.is_empty() {
        return None;
    }
    Some(original)
}

/// `//host/...`形式のリンクにhttpsスキームを補う
fn with_default_scheme(link: &str) -> Cow<'_, str> {
    match link.strip_prefix("//") {
        Some(rest) => Cow::Owned(format!("https://{}", rest)),
        None => Cow::Borrowed(link),
    }
}

fn is_absolute_http(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// オリジンと相対パスを連結する
fn join_origin(origin: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), path)
    }
}

/// スナップショットリンクを元記事の正規URLに変換する
///
/// スナップショット接頭辞を取り除き、元URLが相対なら`source_origin`で補う。
/// 接頭辞のないリンクは絶対URLならそのまま、相対ならオリジンで補う。
pub fn canonicalize_snapshot_link(link: &str, source_origin: &str) -> Result<String> {
    let link = with_default_scheme(link.trim());
    let link = link.as_ref();
    let candidate = match snapshot_original(link) {
        Some(original) if is_absolute_http(original) => original.to_string(),
        Some(original) => join_origin(source_origin, original),
        None if is_absolute_http(link) => link.to_string(),
        None => join_origin(source_origin, link),
    };

    Url::parse(&candidate).with_context(|| format!("正規URLが不正です: {}", candidate))?;
    Ok(candidate)
}

/// 記事本文を取得するためのスナップショットURL
pub fn snapshot_fetch_url(link: &str, snapshot_host: &str) -> Result<String> {
    let link = with_default_scheme(link.trim());
    let link = link.as_ref();
    let url = if is_absolute_http(link) {
        link.to_string()
    } else if link.starts_with('/') {
        join_origin(snapshot_host, link)
    } else {
        return Err(anyhow!("スナップショットリンクの形式が不正です: {}", link));
    };

    Url::parse(&url).with_context(|| format!("スナップショットURLが不正です: {}", url))?;
    Ok(url)
}
