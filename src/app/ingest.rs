use crate::{
    domain::{
        article::{Article, ArticleStore, Collection, SourceTag},
        classifier::classify_article,
        region::{Region, UNKNOWN_REGION},
    },
    infra::{api::http::HttpClient, parser::extract_article_text},
    types::IngestSummary,
};
use anyhow::Result;
use tracing::{debug, warn};

/// 地域の決め方
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionStrategy {
    /// 地域別フィード由来なので地域は確定している（本文は取得しない）
    Fixed(Region),
    /// `text_url`から本文を取得して分類する
    Classify { text_url: String },
}

/// 取り込み候補の記事
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    /// 重複判定に使う正規リンク
    pub link: String,
    pub published: String,
    pub strategy: RegionStrategy,
}

/// 保存先と出所タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestTarget {
    pub collection: Collection,
    pub source: SourceTag,
    pub article_timeout_secs: u64,
}

/// 一件の取り込み結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Inserted { region: &'static str },
    SkippedDuplicate,
}

impl IngestOutcome {
    /// 集計に反映する
    pub fn record(&self, summary: &mut IngestSummary) {
        match self {
            IngestOutcome::Inserted { region } => {
                summary.inserted += 1;
                if *region == UNKNOWN_REGION {
                    summary.unknown_region += 1;
                }
            }
            IngestOutcome::SkippedDuplicate => summary.skipped_duplicate += 1,
        }
    }

    /// 本文取得のための通信が発生したか
    pub fn fetched(&self, strategy: &RegionStrategy) -> bool {
        matches!(
            (self, strategy),
            (IngestOutcome::Inserted { .. }, RegionStrategy::Classify { .. })
        )
    }
}

/// 記事ページを取得して本文テキストを返す
///
/// 取得に失敗した場合は警告を出して空文字列を返す（分類結果は"Unknown"になる）。
pub async fn fetch_article_text<H: HttpClient>(client: &H, url: &str, timeout_secs: u64) -> String {
    match client.fetch_text(url, timeout_secs).await {
        Ok(html) => extract_article_text(&html),
        Err(e) => {
            warn!(url, error = %format!("{:#}", e), "記事本文の取得に失敗");
            String::new()
        }
    }
}

/// 記事候補を一件取り込む
///
/// 既に保存済みのリンクは本文を取得せずにスキップする。
/// 一意制約違反も重複として扱い、それ以外の保存エラーは呼び出し元に返す。
pub async fn ingest_candidate<H: HttpClient>(
    client: &H,
    store: &ArticleStore,
    candidate: Candidate,
    target: IngestTarget,
) -> Result<IngestOutcome> {
    if store.exists(target.collection, &candidate.link).await? {
        debug!(link = %candidate.link, "保存済みのためスキップ");
        return Ok(IngestOutcome::SkippedDuplicate);
    }

    let region = match &candidate.strategy {
        RegionStrategy::Fixed(region) => region.name(),
        RegionStrategy::Classify { text_url } => {
            let text = fetch_article_text(client, text_url, target.article_timeout_secs).await;
            classify_article(&text)
        }
    };

    let article = Article {
        title: candidate.title,
        link: candidate.link,
        region: region.to_string(),
        published: candidate.published,
        source: target.source.as_str().to_string(),
    };

    match store.insert(target.collection, &article).await {
        Ok(()) => {
            debug!(link = %article.link, region, "記事を保存");
            Ok(IngestOutcome::Inserted { region })
        }
        Err(e) if e.is_constraint_violation() => {
            debug!(link = %article.link, "一意制約により重複としてスキップ");
            Ok(IngestOutcome::SkippedDuplicate)
        }
        Err(e) => Err(e.into()),
    }
}
