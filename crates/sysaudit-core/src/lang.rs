//! Fixed line/token patterns for the modeling language.
//!
//! The corpus is produced by the same toolchain that consumes it, so this
//! module deliberately stops at anchored pattern extraction — grammar-level
//! validation is delegated to the external syntax validator (see
//! [`crate::syntax`]).

use std::collections::BTreeSet;

use regex::Regex;

use crate::corpus::ModelFile;

/// Standard-library package and type names that are always resolvable,
/// regardless of what the corpus defines.
pub const STANDARD_LIBRARY: &[&str] = &[
    "Base",
    "ScalarValues",
    "Items",
    "Parts",
    "Ports",
    "Actions",
    "States",
    "Attributes",
    "Connections",
    "Interfaces",
    "Occurrences",
    "Transfers",
    "Flows",
    "Metadata",
    "Collections",
    "ControlFunctions",
    "StringFunctions",
    "NumericalFunctions",
    "BooleanFunctions",
    "SequenceFunctions",
    "Views",
    "Requirements",
    "Time",
    "SI",
    "ISQ",
];

/// Compiled anchored patterns, built once per analysis pass.
#[derive(Debug)]
pub struct LangPatterns {
    package: Regex,
    definition: Regex,
    import: Regex,
    specialization: Regex,
}

impl Default for LangPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl LangPatterns {
    pub fn new() -> Self {
        // Fixed literal patterns; compilation cannot fail. Package and
        // definition headers are token-anchored so constructs sharing a line
        // still register as symbols; imports stay line-anchored so prose
        // mentioning `import X` never counts as a statement.
        Self {
            package: Regex::new(r"\b(?:library\s+)?package\s+([A-Za-z_]\w*)")
                .expect("static pattern"),
            definition: Regex::new(
                r"\b(?:abstract\s+)?(?:part|item|attribute|connection|state|action|port)\s+def\s+([A-Za-z_]\w*)",
            )
            .expect("static pattern"),
            import: Regex::new(r"(?m)^\s*import\s+([A-Za-z_]\w*)").expect("static pattern"),
            specialization: Regex::new(r":>\s*([A-Za-z_]\w*)").expect("static pattern"),
        }
    }

    /// Package names declared in one file.
    pub fn packages_in(&self, content: &str) -> Vec<String> {
        self.package
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Definition names (`part def`, `state def`, …) declared in one file.
    pub fn definitions_in(&self, content: &str) -> Vec<String> {
        self.definition
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// First path segment of every `import` statement in one file.
    pub fn imports_in(&self, content: &str) -> Vec<String> {
        self.import
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Specialization targets (`:> Parent`) referenced in one file.
    pub fn specializations_in(&self, content: &str) -> Vec<String> {
        self.specialization
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Every symbol the corpus defines: package names plus definition names,
    /// across all files.
    pub fn defined_symbols(&self, files: &[ModelFile]) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        for file in files {
            symbols.extend(self.packages_in(&file.content));
            symbols.extend(self.definitions_in(&file.content));
        }
        symbols
    }

    /// Top-level package names declared across the corpus, excluding the
    /// given file (used to compare a master index against the rest).
    pub fn declared_packages(&self, files: &[ModelFile], except: &str) -> BTreeSet<String> {
        let mut packages = BTreeSet::new();
        for file in files {
            if file.path == except {
                continue;
            }
            packages.extend(self.packages_in(&file.content));
        }
        packages
    }
}

/// True when a specialization target looks user-defined: a capitalized
/// identifier. Lowercase targets are keywords or local usages and are not
/// checked for reference integrity.
pub fn is_user_defined_name(symbol: &str) -> bool {
    symbol.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
