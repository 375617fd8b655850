use super::model::{Article, Collection};
use crate::types::{StoreError, StoreResult};
use sqlx::SqlitePool;

/// 記事ストア
///
/// 「current」と「archived」の二つのコレクションを持ち、
/// それぞれリンク（正規化済みURL）で一意に管理する。
#[derive(Debug, Clone)]
pub struct ArticleStore {
    pool: SqlitePool,
}

impl ArticleStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 指定リンクの記事がコレクションに存在するか
    pub async fn exists(&self, collection: Collection, link: &str) -> StoreResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE link = ?)",
            collection.table_name()
        );
        let exists: i64 = sqlx::query_scalar(&sql)
            .bind(link)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::query("記事の存在確認", e))?;

        Ok(exists != 0)
    }

    /// 記事をコレクションに挿入する
    ///
    /// リンクが既に存在する場合は`StoreError::ConstraintViolation`を返し、
    /// 既存のレコードには手を付けない。
    pub async fn insert(&self, collection: Collection, article: &Article) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO {} (title, link, region, published, source) VALUES (?, ?, ?, ?, ?)",
            collection.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(&article.title)
            .bind(&article.link)
            .bind(&article.region)
            .bind(&article.published)
            .bind(&article.source)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                StoreError::constraint_violation(collection.table_name(), &article.link),
            ),
            Err(e) => Err(StoreError::query("記事の挿入", e)),
        }
    }

    /// 指定リンクの記事を取得する
    pub async fn find(&self, collection: Collection, link: &str) -> StoreResult<Option<Article>> {
        let sql = format!(
            "SELECT title, link, region, published, source FROM {} WHERE link = ?",
            collection.table_name()
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(link)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::query("記事の取得", e))
    }

    /// コレクションの全記事を挿入順に取得する
    pub async fn list(&self, collection: Collection) -> StoreResult<Vec<Article>> {
        let sql = format!(
            "SELECT title, link, region, published, source FROM {} ORDER BY id",
            collection.table_name()
        );
        sqlx::query_as::<_, Article>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::query("記事一覧の取得", e))
    }

    /// コレクションの記事数
    pub async fn count(&self, collection: Collection) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table_name());
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::query("記事数の取得", e))
    }
}
