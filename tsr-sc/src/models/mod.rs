//! Data model for the Search Coordinator

mod progress;
mod result;
mod session;

pub use progress::{ProgressRow, SearchSource, SearchStage, StageSet, StageStatus};
pub use result::CandidateResult;
pub use session::{SearchSession, SessionStatus};
