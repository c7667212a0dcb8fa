//! Per-artifact sync states

use std::fmt;

/// Where an artifact is in the sync process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    NotStarted,
    Generating,
    GenerationFailed,
    Generated,
    Comparing,
    TargetMissing,
    Differs,
    Matches,
    Applied,
    Reported,
}

impl SyncState {
    /// Whether the machine may move from `self` to `next`.
    ///
    /// `Comparing -> Reported` covers a target that exists but cannot be read.
    pub fn can_transition_to(self, next: SyncState) -> bool {
        use SyncState::*;
        matches!(
            (self, next),
            (NotStarted, Generating)
                | (Generating, GenerationFailed | Generated)
                | (Generated, Comparing)
                | (Comparing, TargetMissing | Differs | Matches | Reported)
                | (TargetMissing | Differs, Applied | Reported)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SyncState::GenerationFailed | SyncState::Matches | SyncState::Applied | SyncState::Reported
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncState::NotStarted => "not_started",
            SyncState::Generating => "generating",
            SyncState::GenerationFailed => "generation_failed",
            SyncState::Generated => "generated",
            SyncState::Comparing => "comparing",
            SyncState::TargetMissing => "target_missing",
            SyncState::Differs => "differs",
            SyncState::Matches => "matches",
            SyncState::Applied => "applied",
            SyncState::Reported => "reported",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
