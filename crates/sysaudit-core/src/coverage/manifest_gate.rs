//! Global manifest-coverage check and acceptance gate.
//!
//! Before a manifest is trusted to drive generation, its declared patterns,
//! unioned across all cycles, must cover effectively all relevant repository
//! source files. Shortfalls below the configured threshold reject the
//! manifest, with per-directory glob suggestions for the uncovered files.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::corpus::ModelLayout;
use crate::domain::manifest::Manifest;
use crate::domain::report::{coverage_percent, ManifestCoverageResult, PatternSuggestion};

use super::fs_scan::{discover_source_files, expand_patterns};

/// Threshold configuration for the acceptance gate. Always passed
/// explicitly; never process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptanceConfig {
    /// Minimum coverage percentage for the manifest to be accepted.
    pub min_coverage_percent: u32,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            min_coverage_percent: 95,
        }
    }
}

/// Check how much of the repository the manifest's patterns cover, and
/// gate acceptance on the configured threshold.
pub fn check_manifest_coverage(
    repo: &Path,
    layout: &ModelLayout,
    manifest: &Manifest,
    config: AcceptanceConfig,
) -> ManifestCoverageResult {
    let discovered = discover_source_files(repo, layout);

    let mut covered = BTreeSet::new();
    for cycle in manifest.cycles.values() {
        covered.extend(expand_patterns(repo, &cycle.source_files, layout));
    }

    let not_covered: Vec<String> = discovered
        .iter()
        .filter(|path| !covered.contains(*path))
        .cloned()
        .collect();

    let percent = coverage_percent(discovered.len(), not_covered.len());
    let accepted = percent >= config.min_coverage_percent;
    debug!(
        discovered = discovered.len(),
        uncovered = not_covered.len(),
        percent,
        accepted,
        "manifest coverage"
    );

    ManifestCoverageResult {
        suggestions: suggest_patterns(&not_covered),
        discovered_files: discovered.into_iter().collect(),
        not_covered_files: not_covered,
        coverage_percent: percent,
        accepted,
    }
}

/// Group uncovered files by directory and propose one glob per directory
/// holding at least two of them: a combined-extension group when the
/// directory has at most two distinct extensions, else a generic wildcard.
fn suggest_patterns(not_covered: &[String]) -> Vec<PatternSuggestion> {
    let mut by_dir: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for path in not_covered {
        let dir = path.rsplit_once('/').map(|(d, _)| d).unwrap_or(".");
        by_dir.entry(dir.to_string()).or_default().push(path);
    }

    let mut suggestions = Vec::new();
    for (dir, files) in by_dir {
        if files.len() < 2 {
            continue;
        }
        let extensions: BTreeSet<&str> = files
            .iter()
            .filter_map(|f| f.rsplit_once('.').map(|(_, ext)| ext))
            .collect();

        let pattern = match extensions.len() {
            1 => {
                let ext = extensions.iter().next().unwrap_or(&"*");
                format!("{dir}/*.{ext}")
            }
            2 => {
                let group: Vec<&str> = extensions.into_iter().collect();
                format!("{dir}/*.{{{}}}", group.join(","))
            }
            _ => format!("{dir}/*"),
        };

        suggestions.push(PatternSuggestion {
            directory: dir,
            pattern,
            file_count: files.len(),
        });
    }
    suggestions
}
