use crate::domain::region::{region_label, Region};
use crate::domain::tokenizer::normalize_tokens;
use std::collections::HashSet;

/// 本文テキストから記事の地域を判定する
///
/// 各地域について「トークン集合 ∩ 小文字化したキーワード集合」の件数を数え、
/// 最多の地域を返す。同点の場合は宣言順で先の地域を返す。
/// 一致が一つもなければ`None`。タイトルではなく本文のみを渡すこと。
pub fn classify_region(text: &str) -> Option<Region> {
    if text.is_empty() {
        return None;
    }

    let tokens = normalize_tokens(text);
    let mut best: Option<(Region, usize)> = None;

    for region in Region::ALL {
        let matches = region_match_count(&tokens, region);
        if matches == 0 {
            continue;
        }
        // 厳密に上回った場合のみ更新（同点は先勝ち）
        if best.map_or(true, |(_, score)| matches > score) {
            best = Some((region, matches));
        }
    }

    best.map(|(region, _)| region)
}

/// 本文テキストから地域ラベル（地域名または"Unknown"）を返す
pub fn classify_article(text: &str) -> &'static str {
    region_label(classify_region(text))
}

/// トークン集合と地域キーワードの一致件数
fn region_match_count(tokens: &HashSet<String>, region: Region) -> usize {
    region
        .keywords()
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .collect::<HashSet<_>>()
        .iter()
        .filter(|keyword| tokens.contains(keyword.as_str()))
        .count()
}
