//! コマンドライン引数の定義

use crate::domain::feed::DEFAULT_SOURCES_PATH;
use crate::domain::report::DEFAULT_REFERENCE_DATE;
use crate::infra::db::DEFAULT_DATABASE_URL;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// DRの地域ニュースを収集して地域別に分類する
#[derive(Parser, Debug)]
#[command(name = "drregion", author, version, about)]
pub struct Cli {
    /// SQLiteデータベースのURL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// フィード・アーカイブ設定ファイルのパス
    #[arg(long, env = "SOURCES_PATH", default_value = DEFAULT_SOURCES_PATH)]
    pub sources: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 地域別フィードと全国フィードを取り込む
    Live,
    /// Waybackスナップショットから過去記事を取り込む
    Archive {
        /// スナップショット日付（YYYYMMDD）。省略時は設定ファイルの日付
        dates: Vec<String>,
    },
    /// 保存済み記事の週別・地域別集計を表示する
    Report {
        /// 集計行を書き出すJSONファイル
        #[arg(long)]
        json: Option<String>,

        /// 週区切りの基準日
        #[arg(long, default_value = DEFAULT_REFERENCE_DATE)]
        reference_date: NaiveDate,
    },
}
