//! Result types handed back to callers of a discovery run

use crate::crawler::DiscoveryStrategy;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One article title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTitle {
    /// 1-based emission order
    pub sequence: usize,

    /// Cleaned title, never shorter than the configured minimum
    pub title: String,

    /// The article URL
    pub url: String,

    /// Publication date as reported by the platform listing, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    /// The target that was harvested
    pub source: String,

    /// Strategy that produced the candidates
    pub strategy: DiscoveryStrategy,

    /// Candidates discovered, or the platform-reported post total
    pub total_candidates: u64,

    /// Number of entries in `titles`
    pub extracted_count: usize,

    pub titles: Vec<ExtractedTitle>,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// True if the run was stopped early and holds partial results
    pub cancelled: bool,
}

impl HarvestReport {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Share of discovered candidates that yielded a title, as a percentage
    pub fn extraction_rate(&self) -> f64 {
        if self.total_candidates == 0 {
            0.0
        } else {
            (self.extracted_count as f64 / self.total_candidates as f64) * 100.0
        }
    }
}
