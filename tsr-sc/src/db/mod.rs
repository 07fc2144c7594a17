//! Database access for tsr-sc
//!
//! **[SC-DB-010]** Coordinator tables in the shared tsr.db

pub mod progress;
pub mod results;
pub mod sessions;
pub mod webhooks;

use sqlx::SqlitePool;
use std::path::Path;
use tsr_common::Result;

/// Initialize database connection pool
///
/// **[SC-DB-010]** Connects to the shared tsr.db and creates coordinator
/// tables if they don't exist.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    let pool = tsr_common::db::connect(db_path).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Initialize tsr-sc specific tables
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_sessions (
            session_id TEXT PRIMARY KEY,
            query TEXT NOT NULL,
            submitter TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'processing',
            failure_note TEXT,
            reports TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_progress (
            session_id TEXT NOT NULL,
            source TEXT NOT NULL,
            stages TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (session_id, source)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_results (
            session_id TEXT NOT NULL,
            source TEXT NOT NULL,
            candidate_ref TEXT NOT NULL,
            total_score REAL NOT NULL DEFAULT 0.0,
            name TEXT,
            role TEXT,
            company TEXT,
            summary TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (session_id, source, candidate_ref)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Webhook endpoint directory (logical name → url + method)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS webhooks (
            name TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            method TEXT NOT NULL DEFAULT 'POST'
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!(
        "Database tables initialized (search_sessions, search_progress, search_results, webhooks)"
    );

    Ok(())
}
