//! Candidate result rows produced by external workers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::SearchSource;

/// **[SC-RES-010]** One candidate match from one source
///
/// Written (and possibly re-written) by external workers; the coordinator
/// only reads these rows. `(session_id, source, candidate_ref)` identifies a
/// row for ordering and upsert purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub session_id: Uuid,
    pub source: SearchSource,

    /// Source-scoped candidate reference (profile id, ATS id, ...)
    pub candidate_ref: String,

    /// Ranking score assigned by the worker; primary sort key, descending
    pub total_score: f64,

    // Pass-through presentation fields, opaque to the coordinator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Presentation attribute attached at read time by profile enrichment;
    /// never persisted by the coordinator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}
