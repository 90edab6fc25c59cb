/// Discovery run state definitions
///
/// A run moves `Idle -> Discovering -> Extracting -> Done`, or ends in
/// `Failed` when no strategy finds any content.
use serde::Serialize;
use std::fmt;

/// Represents the current state of a discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryState {
    /// Run created, nothing fetched yet
    Idle,

    /// Looking for candidate URLs (platform API, sitemap, homepage crawl)
    Discovering,

    /// Fetching candidates and extracting titles
    Extracting,

    // ===== Terminal States =====
    /// Titles collected (possibly none, if every extraction failed)
    Done,

    /// Every discovery strategy came back empty
    Failed,
}

impl DiscoveryState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: DiscoveryState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Discovering)
                | (Self::Discovering, Self::Extracting)
                | (Self::Discovering, Self::Failed)
                | (Self::Extracting, Self::Done)
        )
    }

    /// Short lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Extracting => "extracting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
