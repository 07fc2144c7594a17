//! Tests for database bootstrap
//!
//! **[TSR-DB-010]** Pool creation, file creation, parent directory handling

use tempfile::TempDir;

#[tokio::test]
async fn test_connect_creates_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("tsr.db");

    let pool = tsr_common::db::connect(&db_path).await.unwrap();

    // A trivial query should succeed on the fresh database
    let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
    assert_eq!(one, 1);
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_connect_creates_missing_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("deeper").join("tsr.db");

    let pool = tsr_common::db::connect(&db_path).await.unwrap();

    sqlx::query("CREATE TABLE IF NOT EXISTS probe (id INTEGER PRIMARY KEY)")
        .execute(&pool)
        .await
        .unwrap();
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_connect_is_reusable_across_pools() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("tsr.db");

    {
        let pool = tsr_common::db::connect(&db_path).await.unwrap();
        sqlx::query("CREATE TABLE persisted (key TEXT PRIMARY KEY, value TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO persisted (key, value) VALUES ('k', 'v')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = tsr_common::db::connect(&db_path).await.unwrap();
    let value: String = sqlx::query_scalar("SELECT value FROM persisted WHERE key = 'k'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(value, "v");
}
