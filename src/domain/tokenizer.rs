use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// 単語トークンのパターン
///
/// 語中のハイフン・アポストロフィ・ピリオドは一つのトークンに含め
/// （"høje-taastrup"、"3.5"）、それ以外の記号は単独のトークンとして切り出す。
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}_]+(?:['’.\-][\p{L}\p{N}_]+)*|\S")
        .expect("固定のトークンパターン")
});

/// デンマーク語のストップワード
static DANISH_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "og", "i", "jeg", "det", "at", "en", "den", "til", "er", "som", "på", "de", "med",
        "han", "af", "for", "ikke", "der", "var", "mig", "sig", "men", "et", "har", "om", "vi",
        "min", "havde", "ham", "hun", "nu", "over", "da", "fra", "du", "ud", "sin", "dem", "os",
        "op", "man", "hans", "hvor", "eller", "hvad", "skal", "selv", "her", "alle", "vil",
        "blev", "kunne", "ind", "når", "være", "dog", "noget", "ville", "jo", "deres", "efter",
        "ned", "skulle", "denne", "end", "dette", "mit", "også", "under", "have", "dig",
        "anden", "hende", "mine", "alt", "meget", "sit", "sine", "vor", "mod", "disse", "hvis",
        "din", "nogle", "hos", "blive", "mange", "ad", "bliver", "hendes", "været", "thi",
        "jer", "sådan",
    ]
    .into_iter()
    .collect()
});

/// 文字列がデンマーク語のストップワードかどうか（小文字で比較）
pub fn is_stopword(word: &str) -> bool {
    DANISH_STOPWORDS.contains(word)
}

/// 本文テキストを正規化されたトークン集合に変換する
///
/// 小文字化 → 単語分割 → 英字のみのトークンに限定 → ストップワード除去。
/// 数字や記号を含むトークンは部分的に削らず丸ごと捨てる。
pub fn normalize_tokens(text: &str) -> HashSet<String> {
    if text.is_empty() {
        return HashSet::new();
    }

    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| token.chars().all(char::is_alphabetic))
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}
