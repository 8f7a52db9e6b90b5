//! Domain model for corpus analysis: manifest, diagnostics, reports, errors.

pub mod diagnostic;
pub mod error;
pub mod manifest;
pub mod report;

pub use diagnostic::{Diagnostic, Severity};
pub use error::{AuditError, Result};
pub use manifest::{CycleKey, CycleSpec, DirectoryAssignment, Manifest, ProjectMeta};
pub use report::{
    coverage_percent, CoverageIssue, CoverageResult, CycleCoverage, IndexMismatch,
    ManifestCoverageResult, MissingReference, PatternSuggestion, ReferenceKind, ValidationResult,
};
