//! Sync results

use authz_fs::NormalizedPath;

use super::SyncState;

/// Outcome for one requested artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub target_path: NormalizedPath,
    pub generator: String,
    /// Why the candidate could not be generated.
    pub generation_error: Option<String>,
    /// Why the target could not be read or written.
    pub io_error: Option<String>,
    pub has_difference: bool,
    /// Unified diff, or a note that the target does not exist.
    pub difference_detail: String,
    pub was_created: bool,
    pub was_updated: bool,
    /// The target now exists, matches the candidate, and needs no review.
    pub succeeded: bool,
    /// Every state visited, starting at [`SyncState::NotStarted`].
    pub trail: Vec<SyncState>,
}

impl SyncResult {
    pub(crate) fn new(target_path: NormalizedPath, generator: String) -> Self {
        Self {
            target_path,
            generator,
            generation_error: None,
            io_error: None,
            has_difference: false,
            difference_detail: String::new(),
            was_created: false,
            was_updated: false,
            succeeded: false,
            trail: vec![SyncState::NotStarted],
        }
    }

    /// The state the artifact ended in.
    pub fn state(&self) -> SyncState {
        self.trail.last().copied().unwrap_or(SyncState::NotStarted)
    }

    /// Whether the artifact passed through `state`.
    pub fn visited(&self, state: SyncState) -> bool {
        self.trail.contains(&state)
    }

    /// Human-readable outcome, with guidance where the user has to act.
    pub fn message(&self) -> String {
        let path = &self.target_path;
        if let Some(error) = &self.generation_error {
            return format!("Failed to generate {path}: {error}");
        }
        if let Some(error) = &self.io_error {
            return format!("Failed to update {path}: {error}");
        }
        match self.state() {
            SyncState::Matches => format!("{path} is in sync"),
            SyncState::Applied if self.was_created => {
                format!("Created {path}. Review the new file and add it to version control")
            }
            SyncState::Applied => format!("Updated {path} to match the schema"),
            SyncState::Reported if self.visited(SyncState::TargetMissing) => {
                format!("File {path} does not exist. Re-run with --auto-fix to create it")
            }
            SyncState::Reported => format!(
                "{path} is out of sync with the schema. Re-run with --auto-fix to update it"
            ),
            other => format!("{path} stopped in state {other}"),
        }
    }
}

/// Results of one sync run, in the order the artifacts were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub results: Vec<SyncResult>,
}

impl SyncReport {
    /// True when every artifact succeeded.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SyncResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }

    pub fn created(&self) -> impl Iterator<Item = &SyncResult> {
        self.results.iter().filter(|r| r.was_created)
    }

    pub fn updated(&self) -> impl Iterator<Item = &SyncResult> {
        self.results.iter().filter(|r| r.was_updated)
    }

    /// Number of artifacts written during the run.
    pub fn writes(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.was_created || r.was_updated)
            .count()
    }
}
