//! tsr-sc - Search Coordinator Microservice
//!
//! **Module Identity:**
//! - Name: tsr-sc (Search Coordinator)
//! - Port: 5740
//!
//! **[SC-OV-010]** Coordinates multi-source candidate searches: persists the
//! session, triggers the external search workers via webhook, and serves the
//! polled aggregate view of per-source progress and enriched results.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use tsr_sc::services::enrichment::{HttpProfileClient, ProfileDirectory};
use tsr_sc::services::orchestrator::SEARCH_WEBHOOK_NAME;
use tsr_sc::services::webhook::{
    DbEndpointResolver, HttpMethod, WebhookDispatcher, WebhookEndpoint, DEFAULT_DISPATCH_TIMEOUT,
};
use tsr_sc::services::{Orchestrator, SessionReader};
use tsr_sc::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting tsr-sc (Search Coordinator) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve root folder and open the shared database
    let toml_config = tsr_common::config::load_toml_config().unwrap_or_default();
    let root_folder = tsr_common::config::resolve_root_folder(Some(&toml_config));
    tsr_common::config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    let db_path = tsr_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let db_pool = tsr_sc::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Register the configured trigger endpoint into the webhook directory;
    // without one, submissions fail with CONFIGURATION_MISSING
    if let Some(webhook) = &toml_config.search_webhook {
        let method = match webhook.method.as_deref() {
            None => HttpMethod::Post,
            Some(m) => HttpMethod::parse(m)
                .ok_or_else(|| anyhow::anyhow!("Unknown webhook method in config: {}", m))?,
        };
        let endpoint = WebhookEndpoint {
            url: webhook.url.clone(),
            method,
        };
        tsr_sc::db::webhooks::set_webhook(&db_pool, SEARCH_WEBHOOK_NAME, &endpoint).await?;
        info!(url = webhook.url.as_str(), method = method.as_str(), "Search webhook registered");
    }

    // Webhook dispatch with a bounded call timeout
    let dispatch_timeout = toml_config
        .webhook_timeout_seconds
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_DISPATCH_TIMEOUT);
    let dispatcher = Arc::new(
        WebhookDispatcher::new(dispatch_timeout)
            .map_err(|e| anyhow::anyhow!("Failed to build webhook dispatcher: {}", e))?,
    );
    let resolver = Arc::new(DbEndpointResolver::new(db_pool.clone()));

    // Profile enrichment collaborators, one per configured source
    let mut profiles = ProfileDirectory::new();
    for (source_name, base_url) in &toml_config.profiles {
        match tsr_sc::models::SearchSource::parse(source_name) {
            Some(source) => {
                let client = HttpProfileClient::new(base_url.clone(), dispatch_timeout)
                    .map_err(|e| anyhow::anyhow!("Failed to build profile client: {}", e))?;
                profiles.register(source, Arc::new(client));
                info!(source = source_name.as_str(), url = base_url.as_str(), "Profile enrichment enabled");
            }
            None => {
                warn!(source = source_name.as_str(), "Ignoring profile config for unknown source");
            }
        }
    }

    let orchestrator = Arc::new(Orchestrator::new(db_pool.clone(), resolver, dispatcher));
    let reader = Arc::new(SessionReader::new(db_pool.clone(), Arc::new(profiles)));

    let state = AppState::new(db_pool, orchestrator, reader);
    let app = tsr_sc::build_router(state);

    let bind_address = toml_config
        .bind_address
        .unwrap_or_else(|| "127.0.0.1:5740".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
