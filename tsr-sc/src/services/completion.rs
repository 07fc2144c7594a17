//! Completion monitor
//!
//! **[SC-CMP-010]** All-of join over the seeded progress rows. Safe to
//! invoke repeatedly and concurrently: the decision is a pure function over
//! one read, and the transition itself is a conditional update that only
//! fires while the session is still `processing`.

use sqlx::SqlitePool;
use uuid::Uuid;
use tsr_common::Result;

use crate::db;

/// Transition the session to `completed` the first time every seeded source
/// has reached its terminal stage
///
/// A session with no seeded progress rows is never considered for
/// completion by this path. Invoked synchronously by the reader on every
/// poll; there is no background timer.
pub async fn check_and_complete(pool: &SqlitePool, session_id: Uuid) -> Result<()> {
    let rows = db::progress::load_progress(pool, session_id).await?;
    if rows.is_empty() {
        return Ok(());
    }

    if !rows.iter().all(|row| row.is_source_complete()) {
        return Ok(());
    }

    // At most one caller observes the transition; repeats are no-ops
    let transitioned = db::sessions::mark_completed(pool, session_id).await?;
    if transitioned {
        tracing::info!(
            session_id = %session_id,
            sources = rows.len(),
            "Search session completed (all sources terminal)"
        );
    }

    Ok(())
}
