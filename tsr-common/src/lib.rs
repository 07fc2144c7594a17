//! Common library for Talent Search Relay modules
//!
//! Shared error types, configuration resolution, and database bootstrap
//! used by the TSR microservices.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
