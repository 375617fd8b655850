use crate::types::{StoreError, StoreResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// データベースURLの既定値（カレントディレクトリのSQLiteファイル）
pub const DEFAULT_DATABASE_URL: &str = "sqlite://dr_articles.db";

/// データベース接続プールを作成
/// ファイルが存在しない場合は新規作成する
pub async fn create_pool(database_url: &str) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(StoreError::connection)?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(StoreError::connection)
}

/// インメモリのデータベース接続プールを作成（テスト・一時利用向け）
///
/// インメモリDBは接続ごとに別物になるため、接続数を1に固定し破棄もしない。
/// 接続が切れることはないので取得時の疎通確認も行わない。
pub async fn create_memory_pool() -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(StoreError::connection)?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .test_before_acquire(false)
        .connect_with(options)
        .await
        .map_err(StoreError::connection)
}

/// データベースの初期化（マイグレーション実行）
pub async fn initialize_database(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StoreError::migration)
}

/// プールの作成とデータベース初期化を一括で行う便利関数
pub async fn setup_database(database_url: &str) -> StoreResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    initialize_database(&pool).await?;
    Ok(pool)
}

/// インメモリDBの作成と初期化を一括で行う
pub async fn setup_memory_database() -> StoreResult<SqlitePool> {
    let pool = create_memory_pool().await?;
    initialize_database(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_memory_database_creates_tables() -> Result<(), anyhow::Error> {
        let pool = setup_memory_database().await?;

        for table in ["articles", "archived_articles"] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await?;
            assert_eq!(count, 1, "テーブル{}が作成されていません", table);
        }

        // マイグレーションは冪等であること
        initialize_database(&pool).await?;

        println!("✅ マイグレーションテスト完了");
        Ok(())
    }

    #[tokio::test]
    async fn test_file_database_is_durable() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("drregion_db_test_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let url = format!("sqlite://{}", path.display());

        let pool = setup_database(&url).await?;
        sqlx::query("INSERT INTO articles (title, link, region, published, source) VALUES (?, ?, ?, ?, ?)")
            .bind("Titel")
            .bind("http://x/durable")
            .bind("Fyn")
            .bind("Unknown")
            .bind("Regional")
            .execute(&pool)
            .await?;
        pool.close().await;

        // 別のプールで開き直してもデータが残っていること
        let reopened = setup_database(&url).await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&reopened)
            .await?;
        reopened.close().await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(count, 1, "永続化されたレコードが読み込めません");
        Ok(())
    }
}
