//! Search submission write path
//!
//! **[SC-ORC-010]** submit → persist session → resolve endpoint → dispatch
//! webhook → seed progress. Fire-and-forget: no polling or waiting happens
//! here. A session is never silently left `processing` after a detected
//! configuration or dispatch failure.

use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db;
use crate::error::SearchError;
use crate::models::SearchSession;
use crate::services::webhook::{EndpointResolver, SearchTrigger, WebhookDispatcher};

/// Logical name of the candidate-search trigger endpoint
pub const SEARCH_WEBHOOK_NAME: &str = "Candidate Search";

/// Orchestrator for the search write path
pub struct Orchestrator {
    pool: SqlitePool,
    resolver: Arc<dyn EndpointResolver>,
    dispatcher: Arc<WebhookDispatcher>,
}

impl Orchestrator {
    pub fn new(
        pool: SqlitePool,
        resolver: Arc<dyn EndpointResolver>,
        dispatcher: Arc<WebhookDispatcher>,
    ) -> Self {
        Self {
            pool,
            resolver,
            dispatcher,
        }
    }

    /// **[SC-ORC-010]** Submit a candidate search
    ///
    /// Returns the new session id on success. On configuration or dispatch
    /// failure the session is transitioned to `failed` with a note before
    /// the error is returned.
    pub async fn submit_search(&self, query: &str, submitter: &str) -> Result<Uuid, SearchError> {
        // Fail fast before any write
        if query.trim().is_empty() {
            return Err(SearchError::InvalidInput("query must not be empty".to_string()));
        }
        if submitter.trim().is_empty() {
            return Err(SearchError::InvalidInput(
                "submitter must not be empty".to_string(),
            ));
        }

        // The session write must succeed before any external call
        let session = SearchSession::new(query, submitter);
        let session_id = session.session_id;
        db::sessions::insert_session(&self.pool, &session).await?;

        let endpoint = match self.resolver.resolve(SEARCH_WEBHOOK_NAME).await? {
            Some(endpoint) => endpoint,
            None => {
                self.fail_session(session_id, "no webhook endpoint configured")
                    .await;
                return Err(SearchError::ConfigurationMissing(
                    SEARCH_WEBHOOK_NAME.to_string(),
                ));
            }
        };

        let payload = SearchTrigger {
            session_id,
            query: session.query.clone(),
            submitter: session.submitter.clone(),
            timestamp: chrono::Utc::now(),
        };

        // Exactly one dispatch attempt; the trigger is irrevocable once sent
        if let Err(e) = self.dispatcher.dispatch(&endpoint, &payload).await {
            self.fail_session(session_id, &format!("webhook dispatch failed: {}", e))
                .await;
            return Err(SearchError::DispatchFailed(e.to_string()));
        }

        // Seeding failure cannot roll back the already-triggered external
        // call; the session stays processing and the completion monitor
        // ignores sessions with no seeded rows.
        if let Err(e) = db::progress::seed_progress(&self.pool, session_id).await {
            tracing::warn!(
                session_id = %session_id,
                error = %e,
                "Failed to seed progress rows after dispatch; session remains processing"
            );
        }

        tracing::info!(
            session_id = %session_id,
            submitter = %session.submitter,
            "Candidate search dispatched"
        );

        Ok(session_id)
    }

    /// Record a terminal failure on the session; the conditional update
    /// keeps already-terminal sessions untouched
    async fn fail_session(&self, session_id: Uuid, note: &str) {
        match db::sessions::mark_failed(&self.pool, session_id, note).await {
            Ok(true) => {
                tracing::info!(session_id = %session_id, note = note, "Search session failed");
            }
            Ok(false) => {
                tracing::debug!(session_id = %session_id, "Session already terminal; failure not re-applied");
            }
            Err(e) => {
                tracing::error!(
                    session_id = %session_id,
                    error = %e,
                    "Could not record session failure"
                );
            }
        }
    }
}
