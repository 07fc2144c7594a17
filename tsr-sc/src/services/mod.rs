//! Search coordination services

pub mod completion;
pub mod enrichment;
pub mod orchestrator;
pub mod reader;
pub mod webhook;

pub use enrichment::{ProfileDirectory, ProfileLookup};
pub use orchestrator::Orchestrator;
pub use reader::{SessionReader, SessionView};
pub use webhook::{EndpointResolver, WebhookDispatcher, WebhookEndpoint};
