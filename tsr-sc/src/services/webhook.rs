//! Webhook endpoint resolution and dispatch
//!
//! **[SC-WH-010]** The dispatcher performs exactly one bounded HTTP call per
//! submission: at-most-once trigger semantics, zero retries. Retry policy,
//! if ever wanted, belongs to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

const USER_AGENT: &str = concat!("tsr-sc/", env!("CARGO_PKG_VERSION"));

/// Default bound on the outbound webhook call
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method a webhook endpoint is registered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Query-style: payload fields become URL query parameters
    Get,
    /// Body-style: payload serialized as a JSON body
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            _ => None,
        }
    }
}

/// Resolved webhook endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    pub url: String,
    pub method: HttpMethod,
}

/// Dispatch failure; surfaced to the orchestrator as a single outcome
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("webhook returned status {0}")]
    Status(u16),
}

/// **[SC-WH-020]** Injected configuration collaborator resolving a logical
/// webhook name to an endpoint; absent is a non-exceptional `None`
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> tsr_common::Result<Option<WebhookEndpoint>>;
}

/// Production resolver backed by the `webhooks` table
pub struct DbEndpointResolver {
    pool: SqlitePool,
}

impl DbEndpointResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EndpointResolver for DbEndpointResolver {
    async fn resolve(&self, name: &str) -> tsr_common::Result<Option<WebhookEndpoint>> {
        crate::db::webhooks::get_webhook(&self.pool, name).await
    }
}

/// Outbound payload carrying the session context to the external workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTrigger {
    pub session_id: Uuid,
    pub query: String,
    pub submitter: String,
    pub timestamp: DateTime<Utc>,
}

impl SearchTrigger {
    /// Query-parameter rendering for GET-style endpoints
    pub fn as_query(&self) -> [(&'static str, String); 4] {
        [
            ("session_id", self.session_id.to_string()),
            ("query", self.query.clone()),
            ("submitter", self.submitter.clone()),
            ("timestamp", self.timestamp.to_rfc3339()),
        ]
    }
}

/// **[SC-WH-010]** Webhook dispatcher
pub struct WebhookDispatcher {
    http_client: reqwest::Client,
}

impl WebhookDispatcher {
    /// Build a dispatcher with a bounded call timeout
    pub fn new(timeout: Duration) -> Result<Self, DispatchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Perform the single trigger call
    ///
    /// Any transport error or non-success response status is a
    /// `DispatchError`; no retries are attempted.
    pub async fn dispatch(
        &self,
        endpoint: &WebhookEndpoint,
        payload: &SearchTrigger,
    ) -> Result<(), DispatchError> {
        tracing::debug!(
            url = %endpoint.url,
            method = endpoint.method.as_str(),
            session_id = %payload.session_id,
            "Dispatching search webhook"
        );

        let request = match endpoint.method {
            HttpMethod::Get => self.http_client.get(&endpoint.url).query(&payload.as_query()),
            HttpMethod::Post => self.http_client.post(&endpoint.url).json(payload),
        };

        let response = request
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }

        Ok(())
    }
}
