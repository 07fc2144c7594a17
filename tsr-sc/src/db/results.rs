//! Candidate result row operations
//!
//! **[SC-RES-010]** Workers upsert by (session, source, candidate_ref);
//! the coordinator reads with a fixed deterministic order.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use tsr_common::Result;

use crate::models::{CandidateResult, SearchSource};

/// Insert or update a result row written by an external worker
pub async fn upsert_result(pool: &SqlitePool, result: &CandidateResult) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO search_results (
            session_id, source, candidate_ref, total_score,
            name, role, company, summary, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(session_id, source, candidate_ref) DO UPDATE SET
            total_score = excluded.total_score,
            name = excluded.name,
            role = excluded.role,
            company = excluded.company,
            summary = excluded.summary,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(result.session_id.to_string())
    .bind(result.source.as_str())
    .bind(&result.candidate_ref)
    .bind(result.total_score)
    .bind(&result.name)
    .bind(&result.role)
    .bind(&result.company)
    .bind(&result.summary)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all result rows for a session
///
/// **[SC-RES-020]** Ordered by `total_score` descending with
/// `candidate_ref` ascending as tie-break, so repeated polls of an
/// unchanged result set never reorder.
pub async fn load_results(pool: &SqlitePool, session_id: Uuid) -> Result<Vec<CandidateResult>> {
    let rows = sqlx::query(
        r#"
        SELECT session_id, source, candidate_ref, total_score, name, role, company, summary
        FROM search_results
        WHERE session_id = ?
        ORDER BY total_score DESC, candidate_ref ASC
        "#,
    )
    .bind(session_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let source: String = row.get("source");
            let source = SearchSource::parse(&source).ok_or_else(|| {
                tsr_common::Error::Internal(format!("Unknown result source: {}", source))
            })?;

            Ok(CandidateResult {
                session_id,
                source,
                candidate_ref: row.get("candidate_ref"),
                total_score: row.get("total_score"),
                name: row.get("name"),
                role: row.get("role"),
                company: row.get("company"),
                summary: row.get("summary"),
                photo_url: None,
            })
        })
        .collect()
}
