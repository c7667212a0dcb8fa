//! Comparison of checked-in artifacts with freshly generated text

use similar::TextDiff;

/// Lines of unchanged context around each hunk.
pub const CONTEXT_LINES: usize = 3;

/// Outcome of comparing an existing artifact with a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comparison {
    pub has_difference: bool,
    /// Unified diff from the existing text to the candidate; empty when equal.
    pub unified_diff: String,
}

impl Comparison {
    pub fn identical() -> Self {
        Self::default()
    }
}

/// Compare `existing` with `candidate`.
///
/// Byte-equal inputs short-circuit to [`Comparison::identical`]. Otherwise the
/// diff headers are `label` for the existing side and `"<label> (generated)"`
/// for the candidate.
pub fn compare(existing: &str, candidate: &str, label: &str) -> Comparison {
    if existing == candidate {
        return Comparison::identical();
    }

    let generated = format!("{label} (generated)");
    let diff = TextDiff::from_lines(existing, candidate);
    let unified_diff = diff
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(label, &generated)
        .to_string();

    Comparison {
        has_difference: true,
        unified_diff,
    }
}
