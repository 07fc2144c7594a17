//! HTTP API for tsr-sc
//!
//! Caller-facing routes (submit, poll, list) plus worker-facing ingest
//! routes the external search workers write through.

mod health;
mod search;

pub use health::{health_check, health_routes};
pub use search::search_routes;
