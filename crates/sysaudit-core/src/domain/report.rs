//! Report types produced by the coverage checkers and the structural
//! validator.
//!
//! All fields are independent, additive issue lists: no field's meaning
//! depends on another being absent, and a consumer may render any subset.

use serde::{Deserialize, Serialize};

use super::diagnostic::Diagnostic;
use super::manifest::CycleKey;

/// Rounded coverage percentage in `[0, 100]`.
///
/// Defined as 100 when `expected` is zero (an empty expectation set is
/// vacuously covered).
pub fn coverage_percent(expected: usize, missing: usize) -> u32 {
    if expected == 0 {
        return 100;
    }
    let covered = expected.saturating_sub(missing);
    ((covered as f64 / expected as f64) * 100.0).round() as u32
}

/// Result of one cycle-level coverage evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult {
    /// Source files the cycle is expected to document, sorted, deduplicated.
    pub expected_files: Vec<String>,

    /// Expected files with a back-reference in the cycle's output subtree.
    pub covered_files: Vec<String>,

    /// Expected files with no back-reference.
    pub missing_files: Vec<String>,

    /// Rounded percentage in `[0, 100]`; 100 when nothing is expected.
    pub coverage_percent: u32,
}

impl CoverageResult {
    /// Vacuous full coverage — nothing expected, nothing missing.
    pub fn vacuous() -> Self {
        Self {
            expected_files: Vec::new(),
            covered_files: Vec::new(),
            missing_files: Vec::new(),
            coverage_percent: 100,
        }
    }
}

/// A suggested glob pattern for files a manifest fails to cover.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternSuggestion {
    /// Directory the uncovered files share.
    pub directory: String,

    /// Proposed glob covering them.
    pub pattern: String,

    /// How many uncovered files the pattern would absorb.
    pub file_count: usize,
}

/// Result of the global manifest-coverage check and acceptance gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestCoverageResult {
    /// All repository source files discovered on disk.
    pub discovered_files: Vec<String>,

    /// Discovered files matched by no cycle's patterns.
    pub not_covered_files: Vec<String>,

    /// Rounded percentage in `[0, 100]`.
    pub coverage_percent: u32,

    /// Glob suggestions for directories with clustered uncovered files.
    pub suggestions: Vec<PatternSuggestion>,

    /// Whether coverage met the acceptance threshold.
    pub accepted: bool,
}

/// Why an import or specialization reference could not be resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Import,
    Specialization,
}

/// A reference to a symbol not defined anywhere in the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissingReference {
    /// Corpus file containing the reference.
    pub file: String,

    /// The unresolved symbol name.
    pub symbol: String,

    pub kind: ReferenceKind,
}

/// A manifest target that does not line up with the repository on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoverageIssue {
    /// A literal source file listed in a cycle does not exist.
    MissingFile { cycle: CycleKey, path: String },

    /// A directory declared in the manifest does not exist.
    MissingDirectory { path: String },

    /// A per-directory pattern matched zero files.
    PatternNoMatch { cycle: CycleKey, pattern: String },
}

/// A mismatch between the master index's imports and the packages the
/// corpus actually declares.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndexMismatch {
    /// The master index imports a package no corpus file declares.
    ImportedButAbsent { package: String },

    /// A corpus file declares a package the master index never imports.
    DeclaredButNotImported { package: String },
}

/// Per-cycle coverage entry inside a [`ValidationResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleCoverage {
    pub cycle: CycleKey,
    pub result: CoverageResult,
}

/// Aggregate result of one structural validation pass.
///
/// Every list is populated independently; the validator never aborts after
/// a failed check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Manifest missing/malformed/shape problems, as rendered strings.
    pub manifest_errors: Vec<String>,

    /// Declared expected outputs absent from the model tree.
    pub missing_outputs: Vec<String>,

    /// Diagnostics mapped from the external grammar validator.
    pub syntax_diagnostics: Vec<Diagnostic>,

    /// Per-cycle back-reference coverage.
    pub cycle_coverage: Vec<CycleCoverage>,

    /// Corpus files not declared as any cycle's expected output.
    pub orphaned_files: Vec<String>,

    /// Unresolved import/specialization references.
    pub missing_references: Vec<MissingReference>,

    /// Manifest targets that do not line up with the repository.
    pub coverage_issues: Vec<CoverageIssue>,

    /// Master-index/declared-package mismatches.
    pub index_mismatches: Vec<IndexMismatch>,
}

impl ValidationResult {
    /// Flattened issue count across every list. Coverage entries count as
    /// issues only when files are missing.
    pub fn total_issues(&self) -> usize {
        self.manifest_errors.len()
            + self.missing_outputs.len()
            + self.syntax_diagnostics.len()
            + self
                .cycle_coverage
                .iter()
                .map(|c| c.result.missing_files.len())
                .sum::<usize>()
            + self.orphaned_files.len()
            + self.missing_references.len()
            + self.coverage_issues.len()
            + self.index_mismatches.len()
    }

    /// True when no check found anything.
    pub fn is_clean(&self) -> bool {
        self.total_issues() == 0
    }
}
