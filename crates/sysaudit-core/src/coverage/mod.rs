//! Coverage checking: per-cycle back-reference coverage and the global
//! manifest-acceptance gate.

mod cycle;
mod fs_scan;
mod manifest_gate;

pub use cycle::cycle_coverage;
pub use fs_scan::{discover_source_files, expand_patterns, is_glob_pattern};
pub use manifest_gate::{check_manifest_coverage, AcceptanceConfig};

/// File extensions considered repository source code.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "rs", "py", "go", "java", "kt", "rb", "c", "cc",
    "cpp", "h", "hpp", "cs", "swift", "php",
];

/// Directory names never scanned: dependencies, build output, version
/// control, caches. The model's own output directory is excluded separately
/// via [`crate::corpus::ModelLayout`].
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    ".git",
    ".hg",
    ".svn",
    "vendor",
    ".venv",
    "venv",
    "__pycache__",
    "coverage",
    ".next",
    ".cache",
];

/// File names excluded from global source discovery.
pub const EXCLUDED_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
    "Gemfile.lock",
    "composer.lock",
];

/// Directory names holding test fixtures or generated artifacts, excluded
/// from global source discovery only (cycle patterns may still target them
/// explicitly).
pub const FIXTURE_DIRS: &[&str] = &["fixtures", "__fixtures__", "__snapshots__", "generated"];
