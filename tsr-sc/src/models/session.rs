//! Search session state machine
//!
//! **[SC-WF-010]** A search session moves through exactly one of two paths:
//! PROCESSING → COMPLETED (all sources terminal, via the completion monitor) or
//! PROCESSING → FAILED (config/dispatch failure, via the orchestrator).
//! Both end states are terminal; no transition ever leaves them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// **[SC-WF-010]** Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Webhook dispatched, external workers still running
    Processing,
    /// Every seeded source reached its terminal stage
    Completed,
    /// Orchestration failed before workers could run
    Failed,
}

impl SessionStatus {
    /// Column value used in the `search_sessions` table
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    /// Parse a stored column value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(SessionStatus::Processing),
            "completed" => Some(SessionStatus::Completed),
            "failed" => Some(SessionStatus::Failed),
            _ => None,
        }
    }

    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

/// **[SC-WF-020]** Search session
///
/// `query`, `submitter`, and `created_at` are immutable after creation.
/// `reports` is written out of band by external workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSession {
    /// Unique session identifier
    pub session_id: Uuid,

    /// Original free-text query
    pub query: String,

    /// Identity of the requester
    pub submitter: String,

    /// Current lifecycle status
    pub status: SessionStatus,

    /// Failure cause recorded by the orchestrator, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_note: Option<String>,

    /// Free-form narrative reports keyed by source, written by workers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<serde_json::Value>,

    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl SearchSession {
    /// Create a new session in `Processing` state
    pub fn new(query: &str, submitter: &str) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            query: query.to_string(),
            submitter: submitter.to_string(),
            status: SessionStatus::Processing,
            failure_note: None,
            reports: None,
            created_at: Utc::now(),
        }
    }

    /// Check if session is terminal (finished)
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
