//! Shared test helpers: stub collaborators and a local webhook receiver
#![allow(dead_code)]

pub mod db_utils;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::routing::any;
use axum::Router;
use std::sync::{Arc, Mutex};

use tsr_sc::services::webhook::{EndpointResolver, WebhookEndpoint};
use tsr_sc::services::ProfileLookup;

/// Endpoint resolver returning a fixed configuration
pub struct StaticResolver(pub Option<WebhookEndpoint>);

#[async_trait]
impl EndpointResolver for StaticResolver {
    async fn resolve(&self, _name: &str) -> tsr_common::Result<Option<WebhookEndpoint>> {
        Ok(self.0.clone())
    }
}

/// Profile lookup returning a fixed photo URL derived from the candidate ref
pub struct FixedPhotoLookup;

#[async_trait]
impl ProfileLookup for FixedPhotoLookup {
    async fn photo_url(&self, candidate_ref: &str) -> tsr_common::Result<Option<String>> {
        Ok(Some(format!("https://photos.example.com/{}.jpg", candidate_ref)))
    }
}

/// Profile lookup that always fails
pub struct FailingLookup;

#[async_trait]
impl ProfileLookup for FailingLookup {
    async fn photo_url(&self, _candidate_ref: &str) -> tsr_common::Result<Option<String>> {
        Err(tsr_common::Error::Internal("profile service unreachable".to_string()))
    }
}

/// Profile lookup that fails for exactly one candidate ref
pub struct FailOneLookup {
    pub failing_ref: String,
}

#[async_trait]
impl ProfileLookup for FailOneLookup {
    async fn photo_url(&self, candidate_ref: &str) -> tsr_common::Result<Option<String>> {
        if candidate_ref == self.failing_ref {
            return Err(tsr_common::Error::Internal("lookup timed out".to_string()));
        }
        Ok(Some(format!("https://photos.example.com/{}.jpg", candidate_ref)))
    }
}

/// One request captured by the webhook stub
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub query: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    status: u16,
}

async fn capture_handler(State(state): State<StubState>, request: Request<Body>) -> StatusCode {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    state.captured.lock().unwrap().push(CapturedRequest {
        method: parts.method.to_string(),
        query: parts.uri.query().map(str::to_string),
        body: String::from_utf8_lossy(&bytes).to_string(),
    });

    StatusCode::from_u16(state.status).unwrap()
}

/// Spawn a local webhook receiver returning the given status code
///
/// Returns the endpoint URL and the captured requests.
pub async fn spawn_webhook_stub(status: u16) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        captured: Arc::clone(&captured),
        status,
    };

    let app = Router::new()
        .route("/hook", any(capture_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/hook", addr), captured)
}
