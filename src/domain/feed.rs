use crate::domain::region::Region;
use crate::infra::storage::file::load_yaml_from_file;
use crate::types::{ConfigError, ConfigResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// ソース設定ファイルの既定パス
pub const DEFAULT_SOURCES_PATH: &str = "config/sources.yaml";

/// 取り込み対象のRSSフィード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// 地域別フィードならその地域、全国フィードなら`None`
    pub region: Option<Region>,
    pub name: String,
    pub link: String,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.link)
    }
}

/// HTTP取得のタイムアウト設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_feed_timeout_secs")]
    pub feed_timeout_secs: u64,
    #[serde(default = "default_article_timeout_secs")]
    pub article_timeout_secs: u64,
}

fn default_feed_timeout_secs() -> u64 {
    30
}

fn default_article_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            feed_timeout_secs: default_feed_timeout_secs(),
            article_timeout_secs: default_article_timeout_secs(),
        }
    }
}

/// Waybackアーカイブ巡回の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// インデックスページURLのテンプレート（`{date}`を置換）
    pub index_url_template: String,
    /// スナップショット相対リンクを解決するホスト
    pub snapshot_host: String,
    /// 元記事のオリジン（相対な元URLの解決に使う）
    pub source_origin: String,
    /// 記事取得ごとの待機秒数
    pub article_delay_secs: u64,
    /// スナップショット日付ごとの待機秒数
    pub date_delay_secs: u64,
    /// 日付指定がない場合に巡回するスナップショット日付
    #[serde(default)]
    pub dates: Vec<String>,
}

impl ArchiveConfig {
    /// 指定日付のインデックスページURL
    pub fn index_url(&self, date: &str) -> String {
        self.index_url_template.replace("{date}", date)
    }

    pub fn article_delay(&self) -> Duration {
        Duration::from_secs(self.article_delay_secs)
    }

    pub fn date_delay(&self) -> Duration {
        Duration::from_secs(self.date_delay_secs)
    }
}

/// `config/sources.yaml`の構造に対応する型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// 地域ごとのRSSフィードURL（地域の宣言順に並ぶ）
    pub regional: BTreeMap<Region, String>,
    /// 全国（Indland）フィードのURL
    pub nationwide: String,
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl SourcesConfig {
    /// 地域別フィードを地域の宣言順で返す
    pub fn regional_feeds(&self) -> Vec<Feed> {
        self.regional
            .iter()
            .map(|(region, link)| Feed {
                region: Some(*region),
                name: region.name().to_string(),
                link: link.clone(),
            })
            .collect()
    }

    /// 全国フィード
    pub fn nationwide_feed(&self) -> Feed {
        Feed {
            region: None,
            name: "Indland".to_string(),
            link: self.nationwide.clone(),
        }
    }

    /// 設定値の検証
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.archive.index_url_template.contains("{date}") {
            return Err(ConfigError::invalid_value(
                "archive.index_url_template に {date} が含まれていません",
            ));
        }
        for date in &self.archive.dates {
            validate_snapshot_date(date)?;
        }
        Ok(())
    }
}

/// スナップショット日付（Waybackのタイムスタンプ先頭、数字8〜14桁）の検証
pub fn validate_snapshot_date(date: &str) -> ConfigResult<()> {
    let valid = (8..=14).contains(&date.len()) && date.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(format!(
            "スナップショット日付はYYYYMMDD形式の数字である必要があります: {}",
            date
        )))
    }
}

/// ソース設定ファイルを読み込んで検証する
pub fn load_sources(file_path: &str) -> Result<SourcesConfig> {
    if !Path::new(file_path).exists() {
        return Err(ConfigError::missing_config_file(file_path).into());
    }
    let config: SourcesConfig = load_yaml_from_file(file_path)
        .with_context(|| format!("ソース設定の読み込みに失敗: {}", file_path))?;
    config.validate()?;
    Ok(config)
}
