//! 記事の週別・地域別集計

use crate::domain::article::Article;
use crate::domain::region::{Region, UNKNOWN_REGION};
use crate::infra::parser::parse_date;
use chrono::{DateTime, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// 集計の基準日の既定値
pub const DEFAULT_REFERENCE_DATE: &str = "2025-01-14";

/// 週単位の集計区間
///
/// 基準日より前の記事はすべて一つの区間にまとめる。
/// 並び順は「基準日前」が先頭、その後は区間開始日順。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekBucket {
    BeforeReference(NaiveDate),
    Week { index: i64, start: NaiveDate },
}

impl WeekBucket {
    /// 日付が属する区間を求める
    pub fn for_date(date: NaiveDate, reference: NaiveDate) -> Self {
        if date < reference {
            return WeekBucket::BeforeReference(reference);
        }
        let index = (date - reference).num_days() / 7 + 1;
        let start = reference + Duration::days((index - 1) * 7);
        WeekBucket::Week { index, start }
    }

    /// 区間の表示ラベル
    pub fn label(&self) -> String {
        match self {
            WeekBucket::BeforeReference(reference) => {
                format!("Before {}", reference.format("%d/%m/%Y"))
            }
            WeekBucket::Week { start, .. } => {
                let end = *start + Duration::days(6);
                format!("{} - {}", start.format("%d/%m"), end.format("%d/%m"))
            }
        }
    }
}

impl fmt::Display for WeekBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

const DATE_ONLY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// 公開日時の文字列から日付を取り出す
///
/// RFC 2822 / RFC 3339 は配信元のオフセットのまま日付を取る。
/// 日付だけの値（`2025-01-15`、スナップショットの`20250115`）はそのまま使い、
/// それ以外は汎用の日付パーサに任せる。解析できなければ`None`。
pub fn published_date(published: &str) -> Option<NaiveDate> {
    let published = published.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(published) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(published) {
        return Some(dt.date_naive());
    }
    for format in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(published, format) {
            return Some(date);
        }
    }
    parse_date(published).ok().map(|dt| dt.date_naive())
}

/// 日付と区間が確定した記事
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedArticle {
    pub article: Article,
    pub date: NaiveDate,
    pub bucket: WeekBucket,
}

/// 区間×地域の集計行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub cluster_date: String,
    pub region: String,
    pub article_count: usize,
    #[serde(skip)]
    pub bucket: WeekBucket,
}

/// 地域の並び順（宣言順、未知の地域は最後）
fn region_order(region: &str) -> (usize, String) {
    let index = Region::ALL
        .iter()
        .position(|r| r.name() == region)
        .unwrap_or(Region::ALL.len());
    (index, region.to_string())
}

/// 集計結果
#[derive(Debug, Clone, Default)]
pub struct ArticleReport {
    /// 日付が解析できた記事
    pub records: Vec<DatedArticle>,
    /// 日付が解析できず除外した記事数
    pub dropped: usize,
    /// 区間→地域の順に並べた集計行
    pub summary: Vec<SummaryRow>,
}

impl ArticleReport {
    /// 記事一覧から集計を作成する
    pub fn build(articles: Vec<Article>, reference: NaiveDate) -> Self {
        let mut records = Vec::new();
        let mut dropped = 0;

        for article in articles {
            match published_date(&article.published) {
                Some(date) => records.push(DatedArticle {
                    bucket: WeekBucket::for_date(date, reference),
                    date,
                    article,
                }),
                None => dropped += 1,
            }
        }

        let mut counts: BTreeMap<(WeekBucket, (usize, String)), usize> = BTreeMap::new();
        for record in &records {
            *counts
                .entry((record.bucket, region_order(&record.article.region)))
                .or_default() += 1;
        }

        let summary = counts
            .into_iter()
            .map(|((bucket, (_, region)), count)| SummaryRow {
                cluster_date: bucket.label(),
                region,
                article_count: count,
                bucket,
            })
            .collect();

        Self {
            records,
            dropped,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 集計に現れる地域（並び順どおり、重複なし）
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<(usize, String)> = self
            .records
            .iter()
            .map(|r| region_order(&r.article.region))
            .collect();
        regions.sort();
        regions.dedup();
        regions.into_iter().map(|(_, name)| name).collect()
    }

    /// 集計に現れる区間（並び順どおり、重複なし）
    pub fn buckets(&self) -> Vec<WeekBucket> {
        let mut buckets: Vec<WeekBucket> = self.summary.iter().map(|row| row.bucket).collect();
        buckets.sort();
        buckets.dedup();
        buckets
    }

    /// 地域が"Unknown"の記事
    pub fn unknown_articles(&self) -> Vec<&DatedArticle> {
        self.records
            .iter()
            .filter(|r| r.article.region.eq_ignore_ascii_case(UNKNOWN_REGION))
            .collect()
    }

    /// 地域×区間の件数表（行は`regions()`、列は`buckets()`の順）
    pub fn heatmap(&self) -> Vec<(String, Vec<usize>)> {
        let buckets = self.buckets();
        self.regions()
            .into_iter()
            .map(|region| {
                let cells = buckets
                    .iter()
                    .map(|bucket| {
                        self.summary
                            .iter()
                            .filter(|row| row.bucket == *bucket && row.region == region)
                            .map(|row| row.article_count)
                            .sum()
                    })
                    .collect();
                (region, cells)
            })
            .collect()
    }

    /// 地域ごとの合計件数（並び順どおり）
    pub fn region_totals(&self) -> Vec<(String, usize)> {
        self.regions()
            .into_iter()
            .map(|region| {
                let total = self
                    .summary
                    .iter()
                    .filter(|row| row.region == region)
                    .map(|row| row.article_count)
                    .sum();
                (region, total)
            })
            .collect()
    }
}
