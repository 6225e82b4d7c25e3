/// Crawl target state definitions
///
/// Every URL discovered during a mirror run moves through these states.
use crate::MirrorError;
use std::fmt;

/// Represents the current state of a URL in the mirror run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    // ===== Active States =====
    /// URL was found in fetched content or configured as a seed
    Discovered,

    /// URL won the visited-cache claim and is scheduled for fetching
    Claimed,

    /// URL is currently being fetched
    Fetching,

    /// Response body has been received
    Fetched,

    /// Body has been rewritten and is ready to persist
    Rewritten,

    // ===== Terminal States =====
    /// Resource was written to the output tree
    Saved,

    /// URL was dropped before fetching (invalid, foreign, duplicate, failed HEAD check)
    Rejected,

    /// Fetch or persistence failed
    Failed,
}

impl TargetState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Saved | Self::Rejected | Self::Failed)
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// Returns true if the lifecycle allows moving from `self` to `next`
    ///
    /// ```text
    /// Discovered -> Claimed -> Fetching -> Fetched -> Rewritten -> Saved
    /// Discovered | Fetching -> Rejected
    /// Fetching | Fetched | Rewritten -> Failed
    /// ```
    pub fn can_transition_to(&self, next: TargetState) -> bool {
        matches!(
            (self, next),
            (Self::Discovered, Self::Claimed)
                | (Self::Discovered, Self::Rejected)
                | (Self::Claimed, Self::Fetching)
                | (Self::Fetching, Self::Fetched)
                | (Self::Fetching, Self::Rejected)
                | (Self::Fetching, Self::Failed)
                | (Self::Fetched, Self::Rewritten)
                | (Self::Fetched, Self::Failed)
                | (Self::Rewritten, Self::Saved)
                | (Self::Rewritten, Self::Failed)
        )
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow
    pub fn advance(self, next: TargetState) -> Result<TargetState, MirrorError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(MirrorError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Returns the lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Claimed => "claimed",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Rewritten => "rewritten",
            Self::Saved => "saved",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
