//! Normalized diagnostic types.
//!
//! The external grammar validator reports line-anchored findings in its own
//! JSON schema; this module is the shape they are mapped into before landing
//! in a [`crate::domain::report::ValidationResult`].

use serde::{Deserialize, Serialize};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

/// A single normalized diagnostic from the grammar validator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,

    /// Validator rule code (e.g. "sysml.unresolved-import"), if any.
    pub code: Option<String>,

    /// Human-readable message.
    pub message: String,

    /// Source file path relative to the model root.
    pub file: Option<String>,

    /// Line number (1-indexed).
    pub line: Option<u32>,

    /// Column number (1-indexed).
    pub column: Option<u32>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(severity: Severity, message: String) -> Self {
        Self {
            severity,
            code: None,
            message,
            file: None,
            line: None,
            column: None,
        }
    }

    /// Set file location.
    pub fn with_location(mut self, file: String, line: u32, column: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Set the rule code.
    pub fn with_code(mut self, code: String) -> Self {
        self.code = Some(code);
        self
    }
}
