//! Search session database operations
//!
//! **[SC-WF-020]** Session persistence and terminal-state transitions.
//! Both terminal transitions are conditional updates guarded on
//! `status = 'processing'`, so concurrent callers cannot double-apply a
//! transition and a terminal state never regresses.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use tsr_common::Result;

use crate::models::{SearchSession, SessionStatus};

/// Insert a freshly created session
///
/// Fails on duplicate session id; sessions are never re-inserted.
pub async fn insert_session(pool: &SqlitePool, session: &SearchSession) -> Result<()> {
    let reports = session
        .reports
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to serialize reports: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO search_sessions (
            session_id, query, submitter, status, failure_note, reports, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.session_id.to_string())
    .bind(&session.query)
    .bind(&session.submitter)
    .bind(session.status.as_str())
    .bind(&session.failure_note)
    .bind(reports)
    .bind(session.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a session by id
pub async fn load_session(pool: &SqlitePool, session_id: Uuid) -> Result<Option<SearchSession>> {
    let row = sqlx::query(
        r#"
        SELECT session_id, query, submitter, status, failure_note, reports, created_at
        FROM search_sessions
        WHERE session_id = ?
        "#,
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(row_to_session).transpose()
}

/// List recent sessions, newest first
pub async fn list_recent_sessions(pool: &SqlitePool, limit: i64) -> Result<Vec<SearchSession>> {
    let rows = sqlx::query(
        r#"
        SELECT session_id, query, submitter, status, failure_note, reports, created_at
        FROM search_sessions
        ORDER BY created_at DESC, session_id ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_session).collect()
}

/// **[SC-WF-030]** Conditionally transition `processing → completed`
///
/// Returns `true` if this call performed the transition; `false` when the
/// session was already terminal (or unknown). Never an error on repeat.
pub async fn mark_completed(pool: &SqlitePool, session_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE search_sessions
        SET status = 'completed'
        WHERE session_id = ? AND status = 'processing'
        "#,
    )
    .bind(session_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// **[SC-WF-030]** Conditionally transition `processing → failed`, recording
/// the cause so all future reads see it without re-deriving
pub async fn mark_failed(pool: &SqlitePool, session_id: Uuid, note: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE search_sessions
        SET status = 'failed', failure_note = ?
        WHERE session_id = ? AND status = 'processing'
        "#,
    )
    .bind(note)
    .bind(session_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Merge a worker-written narrative report into the session's `reports`
/// object under the given key
///
/// The merge is a single `json_set` statement, so concurrent workers
/// writing different keys both persist; last write wins only within one
/// key. Keys are source identifiers and never contain path characters.
pub async fn merge_report(
    pool: &SqlitePool,
    session_id: Uuid,
    key: &str,
    report: &serde_json::Value,
) -> Result<bool> {
    let serialized = serde_json::to_string(report)
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to serialize report: {}", e)))?;

    let result = sqlx::query(
        r#"
        UPDATE search_sessions
        SET reports = json_set(COALESCE(reports, '{}'), '$.' || ?, json(?))
        WHERE session_id = ?
        "#,
    )
    .bind(key)
    .bind(serialized)
    .bind(session_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn row_to_session(row: sqlx::sqlite::SqliteRow) -> Result<SearchSession> {
    let session_id: String = row.get("session_id");
    let session_id = Uuid::parse_str(&session_id)
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to parse session_id: {}", e)))?;

    let status: String = row.get("status");
    let status = SessionStatus::parse(&status)
        .ok_or_else(|| tsr_common::Error::Internal(format!("Unknown session status: {}", status)))?;

    let reports: Option<String> = row.get("reports");
    let reports = reports
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to parse reports: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| tsr_common::Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(SearchSession {
        session_id,
        query: row.get("query"),
        submitter: row.get("submitter"),
        status,
        failure_note: row.get("failure_note"),
        reports,
        created_at,
    })
}
