//! SyncEngine implementation

use authz_codegen::{GeneratorRegistry, RenderInput};
use authz_fs::NormalizedPath;
use authz_schema::SchemaModel;

use super::{ArtifactStore, SyncReport, SyncResult, SyncState};
use crate::compare::compare;
use crate::mapping::OutputMapping;

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Write the generated content when a target is missing or differs.
    pub auto_fix: bool,
}

/// Drives every requested artifact through generate, compare and apply.
///
/// Artifacts are independent: a failure in one is recorded in its
/// [`SyncResult`] and the run continues with the next. Writes are not rolled
/// back when a later artifact fails.
pub struct SyncEngine<'r> {
    registry: &'r GeneratorRegistry,
    options: SyncOptions,
}

impl<'r> SyncEngine<'r> {
    pub fn new(registry: &'r GeneratorRegistry, options: SyncOptions) -> Self {
        Self { registry, options }
    }

    /// Sync every mapping, in order.
    pub fn run(
        &self,
        model: &SchemaModel,
        source_name: &str,
        mappings: &[OutputMapping],
        store: &dyn ArtifactStore,
    ) -> SyncReport {
        let input = RenderInput::new(model, source_name);
        let results = mappings
            .iter()
            .map(|mapping| self.sync_one(&input, mapping, store))
            .collect();
        let report = SyncReport { results };
        tracing::debug!(
            artifacts = report.results.len(),
            writes = report.writes(),
            success = report.is_success(),
            "sync finished"
        );
        report
    }

    fn sync_one(
        &self,
        input: &RenderInput<'_>,
        mapping: &OutputMapping,
        store: &dyn ArtifactStore,
    ) -> SyncResult {
        let mut result = SyncResult::new(mapping.path.clone(), mapping.generator.clone());

        advance(&mut result, SyncState::Generating);
        let candidate = match self.registry.render(&mapping.generator, input) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %mapping.path, generator = %mapping.generator, error = %e, "generation failed");
                result.generation_error = Some(e.to_string());
                advance(&mut result, SyncState::GenerationFailed);
                return result;
            }
        };
        advance(&mut result, SyncState::Generated);

        advance(&mut result, SyncState::Comparing);
        let existing = match store.read(&mapping.path) {
            Ok(existing) => existing,
            Err(e) => {
                result.io_error = Some(e.to_string());
                advance(&mut result, SyncState::Reported);
                return result;
            }
        };

        match existing {
            None => {
                advance(&mut result, SyncState::TargetMissing);
                result.has_difference = true;
                result.difference_detail = format!("File {} does not exist", mapping.path);
                if self.options.auto_fix {
                    self.apply(&mut result, &candidate, store);
                } else {
                    advance(&mut result, SyncState::Reported);
                }
            }
            Some(existing) => {
                if existing == candidate.as_bytes() {
                    advance(&mut result, SyncState::Matches);
                    result.succeeded = true;
                    return result;
                }
                advance(&mut result, SyncState::Differs);
                result.has_difference = true;
                result.difference_detail = describe_difference(&existing, &candidate, &mapping.path);
                if self.options.auto_fix {
                    self.apply(&mut result, &candidate, store);
                } else {
                    advance(&mut result, SyncState::Reported);
                }
            }
        }
        result
    }

    /// Write the candidate. A freshly created file never counts as succeeded.
    fn apply(&self, result: &mut SyncResult, candidate: &str, store: &dyn ArtifactStore) {
        let creating = result.state() == SyncState::TargetMissing;
        match store.write(&result.target_path, candidate) {
            Ok(()) => {
                if creating {
                    result.was_created = true;
                    tracing::info!(path = %result.target_path, "created artifact; needs review");
                } else {
                    result.was_updated = true;
                    result.succeeded = true;
                    tracing::info!(path = %result.target_path, "updated artifact");
                }
                advance(result, SyncState::Applied);
            }
            Err(e) => {
                result.io_error = Some(e.to_string());
                advance(result, SyncState::Reported);
            }
        }
    }
}

/// A unified diff of the lossily decoded target against the candidate.
///
/// Bytes that are not valid UTF-8 decode to U+FFFD, which can hide the only
/// difference from the text diff; a note stands in for the diff then.
fn describe_difference(existing: &[u8], candidate: &str, path: &NormalizedPath) -> String {
    let decoded = String::from_utf8_lossy(existing);
    let comparison = compare(&decoded, candidate, path.as_str());
    if comparison.has_difference {
        comparison.unified_diff
    } else {
        format!("File {path} differs in bytes that are not valid UTF-8")
    }
}

fn advance(result: &mut SyncResult, next: SyncState) {
    let current = result.state();
    debug_assert!(
        current.can_transition_to(next),
        "invalid sync transition {current} -> {next}"
    );
    tracing::debug!(path = %result.target_path, from = %current, to = %next, "sync transition");
    result.trail.push(next);
}
