//! Database setup and progress-driving helpers for integration tests

use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use tsr_sc::db;
use tsr_sc::models::{SearchSession, SearchSource, SearchStage, StageStatus};

/// Create a fresh coordinator database in a temp directory
///
/// The TempDir must outlive the pool.
pub async fn setup_pool() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let pool = db::init_database_pool(&temp_dir.path().join("tsr.db"))
        .await
        .unwrap();
    (temp_dir, pool)
}

/// Insert a processing session with seeded progress rows, as the
/// orchestrator leaves it after a successful dispatch
pub async fn seeded_session(pool: &SqlitePool, query: &str, submitter: &str) -> Uuid {
    let session = SearchSession::new(query, submitter);
    db::sessions::insert_session(pool, &session).await.unwrap();
    db::progress::seed_progress(pool, session.session_id)
        .await
        .unwrap();
    session.session_id
}

/// Drive every stage of one source to the terminal label, the way its
/// external worker would
pub async fn complete_source(pool: &SqlitePool, session_id: Uuid, source: SearchSource) {
    for stage in SearchStage::ORDER {
        let updated = db::progress::update_stage(pool, session_id, source, stage, StageStatus::Done)
            .await
            .unwrap();
        assert!(updated, "progress row should be seeded for {:?}", source);
    }
}
