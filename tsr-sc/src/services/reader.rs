//! Aggregate session read path
//!
//! **[SC-RDR-010]** One idempotent call assembling session, progress, and
//! enriched results. Runs the completion monitor first, so a caller that
//! observes `completed` is guaranteed the progress rows of that read were
//! fully terminal.

use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db;
use crate::error::SearchError;
use crate::models::{CandidateResult, ProgressRow, SearchSession};
use crate::services::completion;
use crate::services::enrichment::ProfileDirectory;

/// Aggregate view returned to polling callers
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session: SearchSession,
    pub progress: Vec<ProgressRow>,
    pub results: Vec<CandidateResult>,
}

/// Session reader/enricher
pub struct SessionReader {
    pool: SqlitePool,
    profiles: Arc<ProfileDirectory>,
}

impl SessionReader {
    pub fn new(pool: SqlitePool, profiles: Arc<ProfileDirectory>) -> Self {
        Self { pool, profiles }
    }

    /// **[SC-RDR-010]** Assemble the aggregate view for one session
    pub async fn get_session_view(&self, session_id: Uuid) -> Result<SessionView, SearchError> {
        completion::check_and_complete(&self.pool, session_id).await?;

        let session = db::sessions::load_session(&self.pool, session_id)
            .await?
            .ok_or_else(|| {
                SearchError::NotFound(format!("search session not found: {}", session_id))
            })?;

        let progress = db::progress::load_progress(&self.pool, session_id).await?;
        let mut results = db::results::load_results(&self.pool, session_id).await?;

        self.profiles.enrich(&mut results).await;

        Ok(SessionView {
            session,
            progress,
            results,
        })
    }
}
