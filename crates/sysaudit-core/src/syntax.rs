//! Bridge to the external grammar-level syntax validator.
//!
//! Grammar validation is delegated to a separate tool (`syside` by default)
//! invoked as one blocking subprocess per validation pass, against the root
//! index file that transitively imports every package. Its JSON diagnostics
//! are mapped into the core [`Diagnostic`] shape.
//!
//! The tool's absence or crash degrades to a single synthetic diagnostic —
//! it never propagates as an error out of the validation entry point.
//! Timeouts and retries belong to the calling orchestration, not here.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::diagnostic::{Diagnostic, Severity};

/// Configuration for the syntax validator subprocess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntaxValidatorConfig {
    /// Path to the validator binary.
    pub binary_path: String,

    /// Extra arguments appended after the generated ones.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for SyntaxValidatorConfig {
    fn default() -> Self {
        Self {
            binary_path: "syside".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// One diagnostic in the validator's JSON output schema.
#[derive(Debug, Clone, Deserialize)]
struct RawDiagnostic {
    #[serde(default)]
    file: Option<String>,

    #[serde(default)]
    line: Option<u32>,

    #[serde(default)]
    column: Option<u32>,

    #[serde(default)]
    severity: Option<String>,

    #[serde(default)]
    code: Option<String>,

    message: String,
}

/// Blocking wrapper around the syntax validator binary.
#[derive(Debug, Clone, Default)]
pub struct SyntaxValidator {
    config: SyntaxValidatorConfig,
}

impl SyntaxValidator {
    pub fn new(config: SyntaxValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate the corpus rooted at `root_file`, searching imports under
    /// `import_paths`. Never fails: any subprocess or parse problem yields
    /// one synthetic warning diagnostic instead.
    pub fn validate(&self, root_file: &Path, import_paths: &[PathBuf]) -> Vec<Diagnostic> {
        let mut command = Command::new(&self.config.binary_path);
        command.arg(root_file).arg("--format").arg("json");
        for path in import_paths {
            command.arg("--import-path").arg(path);
        }
        command.args(&self.config.extra_args);

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                warn!(binary = %self.config.binary_path, error = %e, "syntax validator unavailable");
                return vec![unavailable(&self.config.binary_path, &e.to_string())];
            }
        };

        // Non-zero exit is expected when diagnostics are found; only the
        // output shape decides whether the run was usable.
        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_output(&stdout) {
            Some(diagnostics) => diagnostics,
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = if stderr.trim().is_empty() {
                    "unparseable output".to_string()
                } else {
                    stderr.trim().lines().next().unwrap_or("crashed").to_string()
                };
                warn!(binary = %self.config.binary_path, %detail, "syntax validator produced no usable output");
                vec![unavailable(&self.config.binary_path, &detail)]
            }
        }
    }
}

fn unavailable(binary: &str, detail: &str) -> Diagnostic {
    Diagnostic::new(
        Severity::Warning,
        format!("syntax validation skipped: {binary}: {detail}"),
    )
    .with_code("sysaudit.validator-unavailable".to_string())
}

fn parse_output(stdout: &str) -> Option<Vec<Diagnostic>> {
    let raw: Vec<RawDiagnostic> = serde_json::from_str(stdout.trim()).ok()?;
    Some(raw.into_iter().map(map_raw).collect())
}

fn map_raw(raw: RawDiagnostic) -> Diagnostic {
    let severity = match raw.severity.as_deref() {
        Some("error") => Severity::Error,
        Some("hint") | Some("info") => Severity::Hint,
        _ => Severity::Warning,
    };
    let mut diag = Diagnostic::new(severity, raw.message);
    if let Some(code) = raw.code {
        diag = diag.with_code(code);
    }
    if let Some(file) = raw.file {
        diag = diag.with_location(file, raw.line.unwrap_or(1), raw.column.unwrap_or(1));
    }
    diag
}
