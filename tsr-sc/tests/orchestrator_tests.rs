//! Integration tests for the search submission write path
//!
//! Covers **[SC-ORC-010]**: a submission either returns a session id with
//! the session persisted `processing`, or returns an error with the session
//! (if created) persisted `failed` — never ambiguously left `processing`
//! after a detected config/dispatch failure.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::db_utils::setup_pool;
use helpers::{spawn_webhook_stub, StaticResolver};
use tsr_sc::db;
use tsr_sc::models::{SessionStatus, StageStatus};
use tsr_sc::services::orchestrator::SEARCH_WEBHOOK_NAME;
use tsr_sc::services::webhook::{
    DbEndpointResolver, EndpointResolver, HttpMethod, WebhookDispatcher, WebhookEndpoint,
};
use tsr_sc::services::Orchestrator;
use tsr_sc::SearchError;

fn orchestrator(pool: sqlx::SqlitePool, endpoint: Option<WebhookEndpoint>) -> Orchestrator {
    let dispatcher = Arc::new(WebhookDispatcher::new(Duration::from_secs(5)).unwrap());
    Orchestrator::new(pool, Arc::new(StaticResolver(endpoint)), dispatcher)
}

async fn session_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM search_sessions")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ============================================================================
// Input validation
// ============================================================================

#[tokio::test]
async fn test_empty_query_rejected_before_any_write() {
    let (_dir, pool) = setup_pool().await;
    let orch = orchestrator(pool.clone(), None);

    let result = orch.submit_search("", "recruiter@example.com").await;

    assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    assert_eq!(session_count(&pool).await, 0);
}

#[tokio::test]
async fn test_blank_submitter_rejected_before_any_write() {
    let (_dir, pool) = setup_pool().await;
    let orch = orchestrator(pool.clone(), None);

    let result = orch.submit_search("rust engineer", "   ").await;

    assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    assert_eq!(session_count(&pool).await, 0);
}

// ============================================================================
// Configuration failure
// ============================================================================

#[tokio::test]
async fn test_missing_endpoint_fails_session() {
    let (_dir, pool) = setup_pool().await;
    let orch = orchestrator(pool.clone(), None);

    let result = orch.submit_search("rust engineer", "recruiter@example.com").await;

    assert!(matches!(result, Err(SearchError::ConfigurationMissing(_))));

    // The session was created, then immediately failed with a note
    let sessions = db::sessions::list_recent_sessions(&pool, 10).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, SessionStatus::Failed);
    assert!(sessions[0].failure_note.is_some());

    // No progress rows were seeded
    let progress = db::progress::load_progress(&pool, sessions[0].session_id)
        .await
        .unwrap();
    assert!(progress.is_empty());
}

// ============================================================================
// Dispatch failure
// ============================================================================

#[tokio::test]
async fn test_non_success_response_fails_session() {
    let (_dir, pool) = setup_pool().await;
    let (url, _captured) = spawn_webhook_stub(500).await;
    let orch = orchestrator(
        pool.clone(),
        Some(WebhookEndpoint {
            url,
            method: HttpMethod::Post,
        }),
    );

    let result = orch.submit_search("rust engineer", "recruiter@example.com").await;

    assert!(matches!(result, Err(SearchError::DispatchFailed(_))));

    let sessions = db::sessions::list_recent_sessions(&pool, 10).await.unwrap();
    assert_eq!(sessions[0].status, SessionStatus::Failed);
    let note = sessions[0].failure_note.as_deref().unwrap();
    assert!(note.contains("500"), "failure note should name the status: {}", note);
}

#[tokio::test]
async fn test_transport_error_fails_session() {
    let (_dir, pool) = setup_pool().await;
    // Nothing listens on this port
    let orch = orchestrator(
        pool.clone(),
        Some(WebhookEndpoint {
            url: "http://127.0.0.1:9/hook".to_string(),
            method: HttpMethod::Post,
        }),
    );

    let result = orch.submit_search("rust engineer", "recruiter@example.com").await;

    assert!(matches!(result, Err(SearchError::DispatchFailed(_))));

    let sessions = db::sessions::list_recent_sessions(&pool, 10).await.unwrap();
    assert_eq!(sessions[0].status, SessionStatus::Failed);
}

// ============================================================================
// Successful dispatch
// ============================================================================

#[tokio::test]
async fn test_successful_submission_seeds_progress() {
    let (_dir, pool) = setup_pool().await;
    let (url, captured) = spawn_webhook_stub(200).await;
    let orch = orchestrator(
        pool.clone(),
        Some(WebhookEndpoint {
            url,
            method: HttpMethod::Post,
        }),
    );

    let session_id = orch
        .submit_search("rust engineer", "recruiter@example.com")
        .await
        .unwrap();

    // Session persisted as processing
    let session = db::sessions::load_session(&pool, session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Processing);
    assert_eq!(session.query, "rust engineer");
    assert_eq!(session.submitter, "recruiter@example.com");

    // Exactly one progress row per source, all stages pending
    let progress = db::progress::load_progress(&pool, session_id).await.unwrap();
    assert_eq!(progress.len(), 2);
    for row in &progress {
        assert_eq!(row.stages.sourcing, StageStatus::Pending);
        assert_eq!(row.stages.matching, StageStatus::Pending);
        assert_eq!(row.stages.ranking, StageStatus::Pending);
    }

    // Exactly one dispatch, carrying the full session context as JSON
    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    let payload: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(payload["session_id"], session_id.to_string());
    assert_eq!(payload["query"], "rust engineer");
    assert_eq!(payload["submitter"], "recruiter@example.com");
    assert!(payload["timestamp"].is_string());
}

#[tokio::test]
async fn test_get_endpoint_serializes_payload_as_query() {
    let (_dir, pool) = setup_pool().await;
    let (url, captured) = spawn_webhook_stub(200).await;
    let orch = orchestrator(
        pool.clone(),
        Some(WebhookEndpoint {
            url,
            method: HttpMethod::Get,
        }),
    );

    let session_id = orch
        .submit_search("data scientist", "talent@example.com")
        .await
        .unwrap();

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert!(requests[0].body.is_empty());

    let query = requests[0].query.as_deref().unwrap();
    assert!(query.contains(&format!("session_id={}", session_id)));
    assert!(query.contains("submitter=talent%40example.com") || query.contains("submitter=talent@example.com"));
    assert!(query.contains("query=data+scientist") || query.contains("query=data%20scientist"));
}

// ============================================================================
// Webhook directory
// ============================================================================

#[tokio::test]
async fn test_db_resolver_reads_registered_endpoint() {
    let (_dir, pool) = setup_pool().await;
    let resolver = DbEndpointResolver::new(pool.clone());

    // Nothing registered yet
    assert!(resolver.resolve(SEARCH_WEBHOOK_NAME).await.unwrap().is_none());

    let endpoint = WebhookEndpoint {
        url: "http://127.0.0.1:9001/hook".to_string(),
        method: HttpMethod::Get,
    };
    db::webhooks::set_webhook(&pool, SEARCH_WEBHOOK_NAME, &endpoint).await.unwrap();
    assert_eq!(resolver.resolve(SEARCH_WEBHOOK_NAME).await.unwrap(), Some(endpoint));

    // Re-registering under the same name replaces the endpoint
    let replacement = WebhookEndpoint {
        url: "http://127.0.0.1:9002/hook".to_string(),
        method: HttpMethod::Post,
    };
    db::webhooks::set_webhook(&pool, SEARCH_WEBHOOK_NAME, &replacement).await.unwrap();
    assert_eq!(
        resolver.resolve(SEARCH_WEBHOOK_NAME).await.unwrap(),
        Some(replacement)
    );
    assert!(resolver.resolve("Other Hook").await.unwrap().is_none());
}

#[tokio::test]
async fn test_submission_through_db_resolver_dispatches() {
    let (_dir, pool) = setup_pool().await;
    let (url, captured) = spawn_webhook_stub(200).await;
    db::webhooks::set_webhook(
        &pool,
        SEARCH_WEBHOOK_NAME,
        &WebhookEndpoint {
            url,
            method: HttpMethod::Post,
        },
    )
    .await
    .unwrap();

    let dispatcher = Arc::new(WebhookDispatcher::new(Duration::from_secs(5)).unwrap());
    let orch = Orchestrator::new(
        pool.clone(),
        Arc::new(DbEndpointResolver::new(pool.clone())),
        dispatcher,
    );

    let session_id = orch
        .submit_search("rust engineer", "recruiter@example.com")
        .await
        .unwrap();

    let session = db::sessions::load_session(&pool, session_id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Processing);
    assert_eq!(captured.lock().unwrap().len(), 1);
}
