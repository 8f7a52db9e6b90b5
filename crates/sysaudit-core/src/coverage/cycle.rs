//! Per-cycle back-reference coverage evaluation.
//!
//! Answers, for one generation cycle: what fraction of the repository files
//! it was scoped to have actually been claimed by a back-reference inside
//! that cycle's own output subtree?

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::backref::extract_backrefs_in;
use crate::corpus::{normalize_path, ModelFile, ModelLayout};
use crate::domain::manifest::{CycleKey, Manifest};
use crate::domain::report::{coverage_percent, CoverageResult};

use super::fs_scan::expand_patterns;

/// Evaluate coverage for one cycle.
///
/// An absent manifest or an undeclared cycle yields vacuous full coverage —
/// manifest presence is the structural validator's concern, not this one's.
/// Back-references are scanned only within the cycle's own output subtree
/// (its expected outputs and their directories), so files documented by an
/// earlier cycle never inflate a later cycle's score.
pub fn cycle_coverage(
    repo: &Path,
    layout: &ModelLayout,
    manifest: Option<&Manifest>,
    key: CycleKey,
    corpus: &[ModelFile],
) -> CoverageResult {
    let Some(cycle) = manifest.and_then(|m| m.cycles.get(&key)) else {
        return CoverageResult::vacuous();
    };

    let expected = expand_patterns(repo, &cycle.source_files, layout);
    if expected.is_empty() {
        return CoverageResult::vacuous();
    }

    let roots: BTreeSet<String> = cycle
        .expected_outputs
        .iter()
        .map(|p| normalize_path(p))
        .collect();
    let claimed = extract_backrefs_in(corpus, &roots);

    let covered: Vec<String> = expected
        .iter()
        .filter(|path| claimed.contains(*path))
        .cloned()
        .collect();
    let missing: Vec<String> = expected
        .iter()
        .filter(|path| !claimed.contains(*path))
        .cloned()
        .collect();

    let percent = coverage_percent(expected.len(), missing.len());
    debug!(cycle = %key, expected = expected.len(), missing = missing.len(), percent, "cycle coverage");

    CoverageResult {
        expected_files: expected.into_iter().collect(),
        covered_files: covered,
        missing_files: missing,
        coverage_percent: percent,
    }
}
