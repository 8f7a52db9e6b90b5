//! sysaudit Core Library
//!
//! Corpus primitives, coverage checking, and structural validation for
//! generated model corpora. Diagram extraction lives in `sysaudit-diagram`;
//! console/JSON rendering lives in the CLI.

pub mod backref;
pub mod corpus;
pub mod coverage;
pub mod domain;
pub mod lang;
pub mod syntax;
pub mod telemetry;
pub mod validator;

pub use corpus::{
    extract_block, normalize_path, scan_model_tree, split_corpus, ModelFile, ModelLayout,
    FILE_MARKER,
};

pub use backref::{extract_backrefs, extract_backrefs_in};

pub use domain::{
    coverage_percent, AuditError, CoverageIssue, CoverageResult, CycleCoverage, CycleKey,
    CycleSpec, Diagnostic, DirectoryAssignment, IndexMismatch, Manifest, ManifestCoverageResult,
    MissingReference, PatternSuggestion, ProjectMeta, ReferenceKind, Result, Severity,
    ValidationResult,
};

pub use coverage::{
    check_manifest_coverage, cycle_coverage, discover_source_files, expand_patterns,
    AcceptanceConfig,
};

pub use lang::{is_user_defined_name, LangPatterns, STANDARD_LIBRARY};

pub use syntax::{SyntaxValidator, SyntaxValidatorConfig};

pub use validator::{check_master_index, check_references, validate_model, ValidatorOptions};

pub use telemetry::init_tracing;

/// sysaudit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
