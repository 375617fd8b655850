use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// 公開日時が分からない記事に付ける値
pub const UNKNOWN_PUBLISHED: &str = "Unknown";

// 記事エンティティ（一度挿入したら変更しない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub title: String,
    /// 正規化済みの元URL（コレクション内で一意）
    pub link: String,
    /// 地域名または"Unknown"
    pub region: String,
    /// ソースが配信した日時文字列または"Unknown"
    pub published: String,
    /// "Regional" | "Indland" | "DR"
    pub source: String,
}

/// 記事の保存先コレクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// ライブフィード由来
    Current,
    /// Waybackスナップショット由来
    Archived,
}

impl Collection {
    /// 対応するテーブル名
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Current => "articles",
            Collection::Archived => "archived_articles",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// 記事の取得元タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTag {
    /// 地域別フィード
    Regional,
    /// 全国（Indland）フィード
    Indland,
    /// DRトップページのアーカイブ
    Dr,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Regional => "Regional",
            SourceTag::Indland => "Indland",
            SourceTag::Dr => "DR",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
