//! Structural validation entry point.
//!
//! Runs every check independently and accumulates findings into one
//! [`ValidationResult`]; no check aborts the others. Manifest-dependent
//! checks (expected outputs, orphans, coverage) are skipped when the
//! manifest itself is missing or malformed, and the manifest problem is
//! recorded instead.

mod index_check;
mod references;

pub use index_check::check_master_index;
pub use references::check_references;

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::corpus::{normalize_path, scan_model_tree, ModelLayout};
use crate::coverage::{cycle_coverage, expand_patterns, is_glob_pattern};
use crate::domain::manifest::Manifest;
use crate::domain::report::{CoverageIssue, CycleCoverage, ValidationResult};
use crate::lang::LangPatterns;
use crate::syntax::{SyntaxValidator, SyntaxValidatorConfig};

/// Options for one validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidatorOptions {
    pub layout: ModelLayout,

    /// Syntax delegation config; `None` disables the subprocess entirely
    /// (no synthetic diagnostic is produced in that case).
    pub syntax: Option<SyntaxValidatorConfig>,
}

impl ValidatorOptions {
    /// Options with syntax delegation enabled at defaults.
    pub fn with_syntax() -> Self {
        Self {
            layout: ModelLayout::default(),
            syntax: Some(SyntaxValidatorConfig::default()),
        }
    }
}

/// Validate the model corpus under `repo`.
///
/// Two runs over an unchanged corpus yield identical results.
pub fn validate_model(repo: &Path, options: &ValidatorOptions) -> ValidationResult {
    let layout = &options.layout;
    let model_root = layout.model_root(repo);
    let corpus = scan_model_tree(&model_root);
    let patterns = LangPatterns::new();

    let mut result = ValidationResult::default();

    // Manifest presence and shape.
    let manifest = match Manifest::load(&layout.manifest_path(repo)) {
        Ok(manifest) => {
            result.manifest_errors.extend(manifest.shape_errors());
            Some(manifest)
        }
        Err(e) => {
            result.manifest_errors.push(e.to_string());
            None
        }
    };

    // Manifest-dependent checks.
    if let Some(manifest) = &manifest {
        // Expected outputs must exist on disk.
        for cycle in manifest.cycles.values() {
            for output in &cycle.expected_outputs {
                if !model_root.join(normalize_path(output)).is_file() {
                    result.missing_outputs.push(normalize_path(output));
                }
            }
        }

        // Orphans: corpus files outside the system/index exclusion set and
        // absent from every cycle's expected outputs.
        let declared: BTreeSet<String> = manifest
            .cycles
            .values()
            .flat_map(|c| c.expected_outputs.iter().map(|p| normalize_path(p)))
            .collect();
        for file in &corpus {
            let path = normalize_path(&file.path);
            if !layout.is_system_file(&path) && !declared.contains(&path) {
                result.orphaned_files.push(path);
            }
        }

        // Manifest targets vs. the repository on disk.
        for (key, cycle) in &manifest.cycles {
            for pattern in &cycle.source_files {
                if !is_glob_pattern(pattern) && !repo.join(normalize_path(pattern)).is_file() {
                    result.coverage_issues.push(CoverageIssue::MissingFile {
                        cycle: *key,
                        path: normalize_path(pattern),
                    });
                }
            }
        }
        for dir in &manifest.directories {
            if !repo.join(normalize_path(&dir.path)).is_dir() {
                result.coverage_issues.push(CoverageIssue::MissingDirectory {
                    path: normalize_path(&dir.path),
                });
            } else if let Some(pattern) = &dir.pattern {
                let matched = expand_patterns(repo, std::slice::from_ref(pattern), layout);
                if matched.is_empty() {
                    result.coverage_issues.push(CoverageIssue::PatternNoMatch {
                        cycle: dir.cycle,
                        pattern: pattern.clone(),
                    });
                }
            }
        }

        // Per-cycle back-reference coverage.
        for key in manifest.cycles.keys() {
            result.cycle_coverage.push(CycleCoverage {
                cycle: *key,
                result: cycle_coverage(repo, layout, Some(manifest), *key, &corpus),
            });
        }
    }

    // Corpus-only checks run regardless of manifest state.
    result.missing_references = check_references(&corpus, &patterns);
    result.index_mismatches = check_master_index(&corpus, layout, &patterns);

    // Syntax delegation.
    if let Some(config) = &options.syntax {
        let master = layout.master_index_path(repo);
        if master.is_file() {
            let validator = SyntaxValidator::new(config.clone());
            result.syntax_diagnostics = validator.validate(&master, &[model_root.clone()]);
        }
    }

    info!(
        files = corpus.len(),
        issues = result.total_issues(),
        "validation pass complete"
    );
    result
}
