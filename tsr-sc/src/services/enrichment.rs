//! Profile enrichment collaborators
//!
//! **[SC-ENR-010]** One lookup collaborator per source attaches a
//! presentation attribute (photo URL) to result rows at read time. A
//! missing or failed lookup leaves the attribute absent for that row and
//! never fails the overall read.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{CandidateResult, SearchSource};

const USER_AGENT: &str = concat!("tsr-sc/", env!("CARGO_PKG_VERSION"));

/// Source-specific external profile collaborator
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Look up the photo URL for a candidate reference
    async fn photo_url(&self, candidate_ref: &str) -> tsr_common::Result<Option<String>>;
}

/// HTTP profile lookup against a per-source profile service
///
/// Expects `GET {base_url}/profiles/{candidate_ref}` returning
/// `{"photo_url": "..."}`; 404 means the profile is simply unknown.
pub struct HttpProfileClient {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    photo_url: Option<String>,
}

impl HttpProfileClient {
    pub fn new(base_url: String, timeout: Duration) -> tsr_common::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| tsr_common::Error::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileClient {
    async fn photo_url(&self, candidate_ref: &str) -> tsr_common::Result<Option<String>> {
        let url = format!("{}/profiles/{}", self.base_url, candidate_ref);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| tsr_common::Error::Internal(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(tsr_common::Error::Internal(format!(
                "profile service returned status {}",
                response.status()
            )));
        }

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| tsr_common::Error::Internal(e.to_string()))?;

        Ok(profile.photo_url)
    }
}

/// Per-source registry of profile collaborators
#[derive(Default)]
pub struct ProfileDirectory {
    lookups: HashMap<SearchSource, Arc<dyn ProfileLookup>>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: SearchSource, lookup: Arc<dyn ProfileLookup>) {
        self.lookups.insert(source, lookup);
    }

    /// **[SC-ENR-010]** Attach photo URLs to the given rows
    ///
    /// Per-row failure isolation: one bad lookup only leaves that row's
    /// attribute absent.
    pub async fn enrich(&self, results: &mut [CandidateResult]) {
        for row in results.iter_mut() {
            let Some(lookup) = self.lookups.get(&row.source) else {
                continue;
            };

            match lookup.photo_url(&row.candidate_ref).await {
                Ok(photo_url) => row.photo_url = photo_url,
                Err(e) => {
                    tracing::warn!(
                        session_id = %row.session_id,
                        source = row.source.as_str(),
                        candidate_ref = %row.candidate_ref,
                        error = %e,
                        "Profile enrichment failed; leaving photo absent"
                    );
                }
            }
        }
    }
}
