//! Master-index consistency checking.
//!
//! The master index file imports every top-level package of the corpus.
//! This check reconciles its import list against the packages the corpus
//! actually declares, in both directions.

use crate::corpus::{ModelFile, ModelLayout};
use crate::domain::report::IndexMismatch;
use crate::lang::{LangPatterns, STANDARD_LIBRARY};

/// Compare the master index's imports against declared packages.
///
/// Standard-library imports are never mismatches. A missing master index
/// yields no mismatches here — its absence is reported by the
/// expected-output check.
pub fn check_master_index(
    files: &[ModelFile],
    layout: &ModelLayout,
    patterns: &LangPatterns,
) -> Vec<IndexMismatch> {
    let Some(master) = files.iter().find(|f| f.path == layout.master_index) else {
        return Vec::new();
    };

    let imported: Vec<String> = patterns
        .imports_in(&master.content)
        .into_iter()
        .filter(|name| !STANDARD_LIBRARY.contains(&name.as_str()))
        .collect();
    let declared = patterns.declared_packages(files, &layout.master_index);

    let mut mismatches = Vec::new();
    for package in &imported {
        if !declared.contains(package) {
            mismatches.push(IndexMismatch::ImportedButAbsent {
                package: package.clone(),
            });
        }
    }
    for package in &declared {
        if !imported.iter().any(|i| i == package) {
            mismatches.push(IndexMismatch::DeclaredButNotImported {
                package: package.clone(),
            });
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> ModelFile {
        ModelFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_consistent_index_is_clean() {
        let layout = ModelLayout::default();
        let files = vec![
            file("main.sysml", "import ScalarValues;\nimport Orders;\nimport Billing;\n"),
            file("orders/_index.sysml", "package Orders {}\n"),
            file("billing/_index.sysml", "package Billing {}\n"),
        ];
        let patterns = LangPatterns::new();
        assert!(check_master_index(&files, &layout, &patterns).is_empty());
    }

    #[test]
    fn test_imported_but_absent() {
        let layout = ModelLayout::default();
        let files = vec![
            file("main.sysml", "import Orders;\nimport Phantom;\n"),
            file("orders/_index.sysml", "package Orders {}\n"),
        ];
        let patterns = LangPatterns::new();
        let mismatches = check_master_index(&files, &layout, &patterns);
        assert_eq!(
            mismatches,
            vec![IndexMismatch::ImportedButAbsent {
                package: "Phantom".to_string()
            }]
        );
    }

    #[test]
    fn test_declared_but_not_imported() {
        let layout = ModelLayout::default();
        let files = vec![
            file("main.sysml", "import Orders;\n"),
            file("orders/_index.sysml", "package Orders {}\n"),
            file("billing/_index.sysml", "package Billing {}\n"),
        ];
        let patterns = LangPatterns::new();
        let mismatches = check_master_index(&files, &layout, &patterns);
        assert_eq!(
            mismatches,
            vec![IndexMismatch::DeclaredButNotImported {
                package: "Billing".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_master_index_reports_nothing() {
        let layout = ModelLayout::default();
        let files = vec![file("orders/_index.sysml", "package Orders {}\n")];
        let patterns = LangPatterns::new();
        assert!(check_master_index(&files, &layout, &patterns).is_empty());
    }
}
