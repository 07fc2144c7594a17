//! tsr-sc library interface
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiResult, SearchError};

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{Orchestrator, SessionReader};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool **[SC-DB-010]**
    pub db: SqlitePool,
    /// Search write path **[SC-ORC-010]**
    pub orchestrator: Arc<Orchestrator>,
    /// Aggregate read path **[SC-RDR-010]**
    pub reader: Arc<SessionReader>,
}

impl AppState {
    pub fn new(db: SqlitePool, orchestrator: Arc<Orchestrator>, reader: Arc<SessionReader>) -> Self {
        Self {
            db,
            orchestrator,
            reader,
        }
    }
}

/// Build application router
///
/// **[SC-API-010]** API endpoint routing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::health_routes())
        .with_state(state)
}
