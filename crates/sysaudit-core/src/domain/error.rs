//! Domain-level error taxonomy for sysaudit.

use std::path::PathBuf;

/// Errors produced by corpus analysis and validation.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("manifest not found at {0}")]
    ManifestMissing(PathBuf),

    #[error("manifest is invalid: {0}")]
    ManifestInvalid(String),

    #[error("model root not found at {0}")]
    ModelRootMissing(PathBuf),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sysaudit domain operations.
pub type Result<T> = std::result::Result<T, AuditError>;
