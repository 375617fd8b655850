use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rss::Channel;
use scraper::{Html, Selector};
use std::io::BufRead;

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("固定セレクタ article"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("固定セレクタ p"));

/// XML文字列からRSSチャンネルを解析する
pub fn parse_channel_from_xml_str(xml: &str) -> Result<Channel> {
    parse_channel_from_reader(xml.as_bytes())
}

/// BufReadからRSSチャンネルを解析する
pub fn parse_channel_from_reader<R: BufRead>(reader: R) -> Result<Channel> {
    Channel::read_from(reader).context("RSSチャンネルの解析に失敗")
}

/// 記事ページのHTMLから本文テキストを抽出する
///
/// 最初の`<article>`要素内の`<p>`要素のテキストを半角スペースで連結する。
/// `<article>`要素が存在しない場合は空文字列を返す。
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Some(article) = document.select(&ARTICLE_SELECTOR).next() else {
        return String::new();
    };

    article
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 文字列を日付型に変換するヘルパー関数
///
/// `dateparser`クレートを利用して、様々な形式の日付文字列を解析し、
/// `DateTime<Utc>`型に変換する。
///
/// # サポート形式の例
/// - "2025-01-15"
/// - "2025-01-15T10:00:00Z"
/// - "Tue, 14 Jan 2025 12:00:00 +0100"
pub fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    // `dateparser`はタイムゾーンを持つ`DateTime`を返すため、UTCに変換する
    match dateparser::parse(date_str) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => Err(anyhow!("不正な日付形式: {}", date_str)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    mod rss_tests {
        use super::*;

        #[test]
        fn test_parse_channel_from_xml_str() {
            let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Fyn - seneste nyt</title>
        <link>https://www.dr.dk/nyheder/regionale/fyn</link>
        <description>DR Fyn</description>
        <item>
            <title>Brand i Odense</title>
            <link>https://www.dr.dk/nyheder/regionale/fyn/brand</link>
            <pubDate>Tue, 14 Jan 2025 08:00:00 +0100</pubDate>
        </item>
    </channel>
</rss>"#;
            let channel = parse_channel_from_xml_str(xml).expect("RSSの解析に失敗");
            assert_eq!(channel.items().len(), 1);
            assert_eq!(channel.items()[0].title(), Some("Brand i Odense"));
        }

        #[test]
        fn test_parse_invalid_xml() {
            let result = parse_channel_from_xml_str("<invalid>xml content</broken>");
            assert!(result.is_err(), "無効なXMLでエラーが発生するべき");
        }
    }

    mod html_tests {
        use super::*;

        #[test]
        fn test_extract_article_text() {
            let html = r#"<html><body>
                <header><p>Menu</p></header>
                <article>
                    <h1>Overskrift</h1>
                    <p>Første afsnit om Aarhus.</p>
                    <div><p>Andet afsnit om Randers.</p></div>
                </article>
                <footer><p>Kontakt</p></footer>
            </body></html>"#;

            let text = extract_article_text(html);
            assert_eq!(text, "Første afsnit om Aarhus. Andet afsnit om Randers.");
        }

        #[test]
        fn test_extract_article_text_without_article() {
            let html = "<html><body><p>Ingen artikel her</p></body></html>";
            assert_eq!(extract_article_text(html), "");
            assert_eq!(extract_article_text(""), "");
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_parse_common_date_formats() {
            // ISO 8601 / RFC 3339
            let rfc3339 = "2025-01-14T12:30:00Z";
            let expected = Utc.with_ymd_and_hms(2025, 1, 14, 12, 30, 0).unwrap();
            assert_eq!(parse_date(rfc3339).unwrap(), expected);

            // RFC 2822 (RSSで一般的)
            let rfc2822 = "Tue, 14 Jan 2025 12:30:00 +0000";
            assert_eq!(parse_date(rfc2822).unwrap(), expected);

            // YYYY-MM-DD（dateparserは現在時刻で補完するため、日付のみをチェック）
            let parsed_ymd = parse_date("2025-01-14").unwrap();
            assert_eq!(
                parsed_ymd.date_naive(),
                chrono::NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
                "日付部分が期待と異なります"
            );
        }

        #[test]
        fn test_parse_dr_feed_dates() {
            // DRのフィードは中央ヨーロッパ時間のオフセット付きで配信される
            let dr_date = "Tue, 21 Jan 2025 09:15:00 +0100";
            let expected = Utc.with_ymd_and_hms(2025, 1, 21, 8, 15, 0).unwrap();
            assert_eq!(parse_date(dr_date).unwrap(), expected);

            let gmt_date = "Mon, 20 Jan 2025 23:30:00 GMT";
            let expected = Utc.with_ymd_and_hms(2025, 1, 20, 23, 30, 0).unwrap();
            assert_eq!(parse_date(gmt_date).unwrap(), expected);
        }

        #[test]
        fn test_parse_invalid_formats() {
            assert!(parse_date("Unknown").is_err());
            assert!(parse_date("invalid-date").is_err());
            assert!(parse_date("").is_err());
        }
    }
}
