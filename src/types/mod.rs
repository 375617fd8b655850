//! 型定義モジュール
//!
//! アプリケーション全体で使用される共通的な型定義を管理します。
//! - 設定エラー型
//! - 記事ストアのエラー型と取り込み結果型

pub mod config;
pub mod infra;

// 便利な再エクスポート
pub use config::{ConfigError, ConfigResult};
pub use infra::{IngestSummary, StoreError, StoreResult};
