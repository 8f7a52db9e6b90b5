//! Generation manifest model.
//!
//! The manifest is a JSON document produced by the generation toolchain and
//! treated here as read-only input: it names the project, the generation
//! cycles with their source-file scopes and expected outputs, and the
//! directory-to-cycle assignments.
//!
//! Cycle keys historically appear in two spellings, `"cycle1"` and `"1"`.
//! [`CycleKey`] normalizes both at parse time; call sites only ever see the
//! canonical form.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::error::{AuditError, Result};

/// Canonical key for a generation cycle.
///
/// Deserializes from either `"cycle3"` or `"3"`; always serializes as
/// `"cycle3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleKey(pub u32);

impl CycleKey {
    /// Parse either accepted spelling. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("cycle").unwrap_or(raw);
        digits.parse::<u32>().ok().map(CycleKey)
    }
}

impl fmt::Display for CycleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle{}", self.0)
    }
}

impl Serialize for CycleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CycleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CycleKey::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid cycle key: {raw:?}")))
    }
}

/// Project metadata carried in the manifest header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// One generation cycle: which repository files it documents and which
/// corpus files it is expected to produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CycleSpec {
    /// Human-readable cycle name (e.g. "Domain entities").
    #[serde(default)]
    pub name: String,

    /// Source-file scope: literal paths or glob patterns, repo-relative.
    #[serde(default)]
    pub source_files: Vec<String>,

    /// Corpus files this cycle must produce, model-root-relative.
    #[serde(default)]
    pub expected_outputs: Vec<String>,
}

/// Assignment of a repository directory to the cycle that documents it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryAssignment {
    /// Repository-relative directory path.
    pub path: String,

    /// Cycle responsible for this directory.
    pub cycle: CycleKey,

    /// Optional glob pattern scoping which files in the directory count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// The full generation manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub project: ProjectMeta,

    #[serde(default)]
    pub cycles: BTreeMap<CycleKey, CycleSpec>,

    #[serde(default)]
    pub directories: Vec<DirectoryAssignment>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// - `AuditError::ManifestMissing` — the file does not exist.
    /// - `AuditError::ManifestInvalid` — the file is not valid manifest JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AuditError::ManifestMissing(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| AuditError::ManifestInvalid(e.to_string()))
    }

    /// Structural errors that make the manifest unusable for coverage and
    /// output checks. Returned as strings for direct inclusion in a report.
    pub fn shape_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.version.trim().is_empty() {
            errors.push("manifest is missing a version".to_string());
        }
        if self.cycles.is_empty() {
            errors.push("manifest declares no cycles".to_string());
        }
        for (key, cycle) in &self.cycles {
            if cycle.expected_outputs.is_empty() {
                errors.push(format!("{key} declares no expected outputs"));
            }
        }
        for dir in &self.directories {
            if !self.cycles.contains_key(&dir.cycle) {
                errors.push(format!(
                    "directory {:?} is assigned to undeclared {}",
                    dir.path, dir.cycle
                ));
            }
        }
        errors
    }

    /// Directories assigned to the given cycle.
    pub fn directories_for(&self, key: CycleKey) -> impl Iterator<Item = &DirectoryAssignment> {
        self.directories.iter().filter(move |d| d.cycle == key)
    }
}
