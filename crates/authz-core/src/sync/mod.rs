//! Sync orchestration
//!
//! Each requested artifact walks its own state machine:
//!
//! ```text
//! NotStarted -> Generating -> GenerationFailed
//!                          -> Generated -> Comparing -> Matches
//!                                                    -> TargetMissing -> Applied | Reported
//!                                                    -> Differs       -> Applied | Reported
//! ```
//!
//! - **state**: the states and their allowed transitions
//! - **store**: where artifacts are read from and written to
//! - **engine**: drives every mapping through the machine
//! - **report**: per-artifact results and the aggregate report

mod engine;
mod report;
mod state;
mod store;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{SyncReport, SyncResult};
pub use state::SyncState;
pub use store::{ArtifactStore, DiskStore, MemoryStore};
