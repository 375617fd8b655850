use crate::{
    domain::{
        article::{ArticleStore, Collection},
        report::ArticleReport,
    },
    infra::storage::file::save_json_to_file,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::fmt::Write;
use tracing::info;

/// 無作為抽出で表示する記事数
pub const SAMPLE_SIZE: usize = 10;

const BAR_WIDTH: usize = 30;

/// 保存済み記事の集計を表示する
///
/// `json_path`が指定されていれば集計行をJSONとして書き出す。
/// 記事が一件もなければメッセージを表示して`None`を返す。
pub async fn run_report(
    store: &ArticleStore,
    reference: NaiveDate,
    json_path: Option<&str>,
) -> Result<Option<ArticleReport>> {
    let articles = store
        .list(Collection::Current)
        .await
        .context("記事一覧の取得に失敗")?;
    info!(count = articles.len(), "記事を読み込み");

    if articles.is_empty() {
        println!("保存された記事がありません。");
        return Ok(None);
    }

    let report = ArticleReport::build(articles, reference);
    if report.dropped > 0 {
        info!(dropped = report.dropped, "公開日を解析できない記事を除外");
    }
    if report.is_empty() {
        println!("公開日を解析できる記事がありません。");
        return Ok(None);
    }

    println!("{}", render_report(&report, &mut rand::rng()));

    if let Some(path) = json_path {
        save_json_to_file(&report.summary, path)?;
        println!("集計結果をJSONに書き出しました: {}", path);
    }

    Ok(Some(report))
}

/// 集計結果全体を表示用の文字列にする
pub fn render_report<R: Rng + ?Sized>(report: &ArticleReport, rng: &mut R) -> String {
    [
        render_regions(report),
        render_summary_table(report),
        render_sample(report, rng, SAMPLE_SIZE),
        render_unknown_articles(report),
        render_heatmap(report),
        render_region_shares(report),
    ]
    .join("\n")
}

pub fn render_regions(report: &ArticleReport) -> String {
    format!("=== 地域一覧 ===\n{}\n", report.regions().join(", "))
}

/// 区間×地域の件数表
pub fn render_summary_table(report: &ArticleReport) -> String {
    let rows: Vec<Vec<String>> = report
        .summary
        .iter()
        .map(|row| {
            vec![
                row.cluster_date.clone(),
                row.region.clone(),
                row.article_count.to_string(),
            ]
        })
        .collect();
    format!(
        "=== 週別・地域別の記事数 ===\n{}",
        format_table(&["cluster_date", "region", "article_count"], &rows)
    )
}

/// 分類の目視確認用に記事を無作為に抽出する
pub fn render_sample<R: Rng + ?Sized>(report: &ArticleReport, rng: &mut R, size: usize) -> String {
    let rows: Vec<Vec<String>> = report
        .records
        .choose_multiple(rng, size)
        .map(|r| vec![r.article.title.clone(), r.article.region.clone()])
        .collect();
    format!(
        "=== 無作為抽出（{}件） ===\n{}",
        rows.len(),
        format_table(&["title", "region"], &rows)
    )
}

pub fn render_unknown_articles(report: &ArticleReport) -> String {
    let unknown = report.unknown_articles();
    if unknown.is_empty() {
        return "=== 地域不明の記事 ===\nすべての記事に地域が割り当てられています。\n".to_string();
    }

    let rows: Vec<Vec<String>> = unknown
        .iter()
        .map(|r| {
            vec![
                r.article.title.clone(),
                r.article.link.clone(),
                r.date.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    format!(
        "=== 地域不明の記事（{}件） ===\n{}",
        unknown.len(),
        format_table(&["title", "link", "date"], &rows)
    )
}

/// 地域×区間のマトリクス
pub fn render_heatmap(report: &ArticleReport) -> String {
    let buckets = report.buckets();
    let mut headers = vec!["region".to_string()];
    headers.extend(buckets.iter().map(|b| b.label()));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let rows: Vec<Vec<String>> = report
        .heatmap()
        .into_iter()
        .map(|(region, cells)| {
            let mut row = vec![region];
            row.extend(cells.iter().map(|&n| if n == 0 { ".".to_string() } else { n.to_string() }));
            row
        })
        .collect();
    format!(
        "=== 地域×週のヒートマップ ===\n{}",
        format_table(&header_refs, &rows)
    )
}

/// 地域ごとの合計と割合（横棒グラフ）
pub fn render_region_shares(report: &ArticleReport) -> String {
    let totals = report.region_totals();
    let sum: usize = totals.iter().map(|(_, n)| n).sum();
    let max = totals.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|(region, count)| {
            let share = if sum == 0 {
                0.0
            } else {
                *count as f64 * 100.0 / sum as f64
            };
            let bar_len = if max == 0 {
                0
            } else {
                (*count * BAR_WIDTH).div_ceil(max)
            };
            vec![
                region.clone(),
                count.to_string(),
                format!("{:.1}%", share),
                "█".repeat(bar_len),
            ]
        })
        .collect();
    format!(
        "=== 地域別の割合 ===\n{}",
        format_table(&["region", "count", "share", ""], &rows)
    )
}

/// 左寄せの簡易テーブル
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &header_cells, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &separator, &widths);
    for row in rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}
