//! Per-source search progress
//!
//! **[SC-PRG-010]** One progress row per (session, source), seeded at session
//! creation and mutated only by the external worker that owns the source.
//! Stage labels are a closed enumeration so the source-complete check is a
//! total function rather than string matching.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// **[SC-PRG-010]** Logical candidate sources, fixed at session-creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// Company-internal talent pool
    Internal,
    /// External sourcing platforms
    External,
}

impl SearchSource {
    /// All sources seeded for every session
    pub const ALL: [SearchSource; 2] = [SearchSource::Internal, SearchSource::External];

    /// Column value used in the `search_progress` table
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSource::Internal => "internal",
            SearchSource::External => "external",
        }
    }

    /// Parse a stored column value or path segment
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(SearchSource::Internal),
            "external" => Some(SearchSource::External),
            _ => None,
        }
    }
}

/// Pipeline stages each worker reports, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStage {
    /// Candidate discovery against the source
    Sourcing,
    /// Matching candidates against the query
    Matching,
    /// Scoring and ordering the matched set
    Ranking,
}

impl SearchStage {
    /// Stage execution order; `Ranking` is the designated final stage
    pub const ORDER: [SearchStage; 3] =
        [SearchStage::Sourcing, SearchStage::Matching, SearchStage::Ranking];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStage::Sourcing => "sourcing",
            SearchStage::Matching => "matching",
            SearchStage::Ranking => "ranking",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sourcing" => Some(SearchStage::Sourcing),
            "matching" => Some(SearchStage::Matching),
            "ranking" => Some(SearchStage::Ranking),
            _ => None,
        }
    }
}

/// Status label a worker attaches to a stage; `Done` is the terminal label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Seeded placeholder, worker has not reached this stage
    Pending,
    /// Worker is executing this stage
    Running,
    /// Stage finished
    Done,
}

impl StageStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Done)
    }
}

/// Ordered stage → status mapping, stored as a JSON column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSet {
    pub sourcing: StageStatus,
    pub matching: StageStatus,
    pub ranking: StageStatus,
}

impl StageSet {
    /// All stages at the non-terminal seed placeholder
    pub fn seeded() -> Self {
        Self {
            sourcing: StageStatus::Pending,
            matching: StageStatus::Pending,
            ranking: StageStatus::Pending,
        }
    }

    pub fn get(&self, stage: SearchStage) -> StageStatus {
        match stage {
            SearchStage::Sourcing => self.sourcing,
            SearchStage::Matching => self.matching,
            SearchStage::Ranking => self.ranking,
        }
    }

    pub fn set(&mut self, stage: SearchStage, status: StageStatus) {
        match stage {
            SearchStage::Sourcing => self.sourcing = status,
            SearchStage::Matching => self.matching = status,
            SearchStage::Ranking => self.ranking = status,
        }
    }

    /// **[SC-PRG-020]** A source is complete when its designated final stage
    /// carries the terminal label; earlier stages are not consulted.
    pub fn is_source_complete(&self) -> bool {
        self.ranking.is_terminal()
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self::seeded()
    }
}

/// **[SC-PRG-010]** Progress row for one (session, source) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    pub session_id: Uuid,
    pub source: SearchSource,
    pub stages: StageSet,
}

impl ProgressRow {
    /// Freshly seeded row with every stage `Pending`
    pub fn seeded(session_id: Uuid, source: SearchSource) -> Self {
        Self {
            session_id,
            source,
            stages: StageSet::seeded(),
        }
    }

    pub fn is_source_complete(&self) -> bool {
        self.stages.is_source_complete()
    }
}
