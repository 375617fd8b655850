use thiserror::Error;

/// 記事ストア層のエラー型
/// データベース接続、クエリ、マイグレーション、一意制約違反を定義
#[derive(Error, Debug)]
pub enum StoreError {
    /// 同じリンクが既に同じコレクションに存在する
    #[error("リンクが既に存在します: {collection} - {link}")]
    ConstraintViolation { collection: String, link: String },

    /// データベース接続エラー
    #[error("データベース接続エラー: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// データベースクエリエラー
    #[error("データベースクエリエラー: {operation} - {source}")]
    Query {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    /// マイグレーションエラー
    #[error("データベースマイグレーションエラー: {source}")]
    Migration {
        #[source]
        source: sqlx::migrate::MigrateError,
    },
}

impl StoreError {
    /// 一意制約違反エラーを作成
    pub fn constraint_violation<C: Into<String>, L: Into<String>>(collection: C, link: L) -> Self {
        Self::ConstraintViolation {
            collection: collection.into(),
            link: link.into(),
        }
    }

    /// データベース接続エラーを作成
    pub fn connection(source: sqlx::Error) -> Self {
        Self::Connection { source }
    }

    /// データベースクエリエラーを作成
    pub fn query<O: Into<String>>(operation: O, source: sqlx::Error) -> Self {
        Self::Query {
            operation: operation.into(),
            source,
        }
    }

    /// マイグレーションエラーを作成
    pub fn migration(source: sqlx::migrate::MigrateError) -> Self {
        Self::Migration { source }
    }

    /// 重複による挿入拒否かどうか
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// ストアエラーのResult型エイリアス
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// 取り込み処理の結果を表す構造体
/// 新規挿入、重複スキップ、地域不明、失敗したソースの件数を記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    /// 新規挿入された件数
    pub inserted: usize,
    /// 重複によりスキップされた件数
    pub skipped_duplicate: usize,
    /// 挿入のうち地域が"Unknown"になった件数
    pub unknown_region: usize,
    /// 取得または解析に失敗したフィード・スナップショットの数
    pub failed_sources: usize,
}

impl IngestSummary {
    /// 新しい結果を作成
    pub fn new(
        inserted: usize,
        skipped_duplicate: usize,
        unknown_region: usize,
        failed_sources: usize,
    ) -> Self {
        Self {
            inserted,
            skipped_duplicate,
            unknown_region,
            failed_sources,
        }
    }

    /// 空の結果（全て0）を作成
    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// 別の結果を合算する
    pub fn merge(&mut self, other: &IngestSummary) {
        self.inserted += other.inserted;
        self.skipped_duplicate += other.skipped_duplicate;
        self.unknown_region += other.unknown_region;
        self.failed_sources += other.failed_sources;
    }

    /// ドメイン名を指定して表示用の文字列を生成
    pub fn display_with_domain(&self, domain_name: &str) -> String {
        format!(
            "{}処理完了: 新規{}件（地域不明{}件）、重複スキップ{}件、失敗ソース{}件",
            domain_name,
            self.inserted,
            self.unknown_region,
            self.skipped_duplicate,
            self.failed_sources
        )
    }
}

impl Default for IngestSummary {
    fn default() -> Self {
        Self::empty()
    }
}

// 汎用的なDisplay実装（デフォルトでは「記事」という名称を使用）
impl std::fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_with_domain("記事"))
    }
}
