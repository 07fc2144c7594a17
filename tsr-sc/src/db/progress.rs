//! Per-source progress row operations
//!
//! **[SC-PRG-010]** Rows are seeded once by the orchestrator; stage updates
//! come from exactly one external worker per source, so last-write-wins on
//! the `stages` column needs no arbitration.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use tsr_common::Result;

use crate::models::{ProgressRow, SearchSource, SearchStage, StageSet, StageStatus};

/// Seed one progress row per known source with all stages `Pending`
pub async fn seed_progress(pool: &SqlitePool, session_id: Uuid) -> Result<()> {
    let stages = serde_json::to_string(&StageSet::seeded())
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to serialize stages: {}", e)))?;
    let now = Utc::now().to_rfc3339();

    for source in SearchSource::ALL {
        sqlx::query(
            r#"
            INSERT INTO search_progress (session_id, source, stages, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(session_id.to_string())
        .bind(source.as_str())
        .bind(&stages)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Load all progress rows for a session, ordered by source for stable display
pub async fn load_progress(pool: &SqlitePool, session_id: Uuid) -> Result<Vec<ProgressRow>> {
    let rows = sqlx::query(
        r#"
        SELECT session_id, source, stages
        FROM search_progress
        WHERE session_id = ?
        ORDER BY source ASC
        "#,
    )
    .bind(session_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let source: String = row.get("source");
            let source = SearchSource::parse(&source).ok_or_else(|| {
                tsr_common::Error::Internal(format!("Unknown progress source: {}", source))
            })?;

            let stages: String = row.get("stages");
            let stages: StageSet = serde_json::from_str(&stages)
                .map_err(|e| tsr_common::Error::Internal(format!("Failed to parse stages: {}", e)))?;

            Ok(ProgressRow {
                session_id,
                source,
                stages,
            })
        })
        .collect()
}

/// Update one stage label on an existing seeded row
///
/// Returns `false` when no row was seeded for (session, source); workers
/// never create rows through this path.
pub async fn update_stage(
    pool: &SqlitePool,
    session_id: Uuid,
    source: SearchSource,
    stage: SearchStage,
    status: StageStatus,
) -> Result<bool> {
    let existing: Option<String> = sqlx::query_scalar(
        "SELECT stages FROM search_progress WHERE session_id = ? AND source = ?",
    )
    .bind(session_id.to_string())
    .bind(source.as_str())
    .fetch_optional(pool)
    .await?;

    let Some(existing) = existing else {
        return Ok(false);
    };

    let mut stages: StageSet = serde_json::from_str(&existing)
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to parse stages: {}", e)))?;
    stages.set(stage, status);

    let serialized = serde_json::to_string(&stages)
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to serialize stages: {}", e)))?;

    sqlx::query(
        r#"
        UPDATE search_progress
        SET stages = ?, updated_at = ?
        WHERE session_id = ? AND source = ?
        "#,
    )
    .bind(serialized)
    .bind(Utc::now().to_rfc3339())
    .bind(session_id.to_string())
    .bind(source.as_str())
    .execute(pool)
    .await?;

    Ok(true)
}
