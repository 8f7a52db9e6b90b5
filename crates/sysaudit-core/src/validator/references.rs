//! Reference-integrity checking.
//!
//! Collects every symbol the corpus defines (package and definition names),
//! unions the fixed standard-library set, then flags `import` targets and
//! user-defined-looking specialization targets that resolve to nothing.

use std::collections::BTreeSet;

use crate::corpus::ModelFile;
use crate::domain::report::{MissingReference, ReferenceKind};
use crate::lang::{is_user_defined_name, LangPatterns, STANDARD_LIBRARY};

/// Check import and specialization references across the whole corpus.
pub fn check_references(files: &[ModelFile], patterns: &LangPatterns) -> Vec<MissingReference> {
    let mut known = patterns.defined_symbols(files);
    known.extend(STANDARD_LIBRARY.iter().map(|s| s.to_string()));

    let mut seen = BTreeSet::new();
    let mut missing = Vec::new();

    for file in files {
        for symbol in patterns.imports_in(&file.content) {
            if !known.contains(&symbol)
                && seen.insert((file.path.clone(), symbol.clone(), ReferenceKind::Import))
            {
                missing.push(MissingReference {
                    file: file.path.clone(),
                    symbol,
                    kind: ReferenceKind::Import,
                });
            }
        }
        for symbol in patterns.specializations_in(&file.content) {
            if !is_user_defined_name(&symbol) {
                continue;
            }
            if !known.contains(&symbol)
                && seen.insert((file.path.clone(), symbol.clone(), ReferenceKind::Specialization))
            {
                missing.push(MissingReference {
                    file: file.path.clone(),
                    symbol,
                    kind: ReferenceKind::Specialization,
                });
            }
        }
    }
    missing
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
    fn test_resolved_references_pass() {
        let files = vec![
            file("a.sysml", "package Billing {\n part def Invoice {} \n}"),
            file(
                "b.sysml",
                "package Orders {\n import Billing;\n part def Order :> Invoice {}\n}",
            ),
        ];
        let patterns = LangPatterns::new();
        assert!(check_references(&files, &patterns).is_empty());
    }

    #[test]
    fn test_unresolved_import_flagged() {
        let files = vec![file("a.sysml", "package A {\n import Payments;\n}")];
        let patterns = LangPatterns::new();
        let missing = check_references(&files, &patterns);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].symbol, "Payments");
        assert_eq!(missing[0].kind, ReferenceKind::Import);
        assert_eq!(missing[0].file, "a.sysml");
    }

    #[test]
    fn test_standard_library_always_resolves() {
        let files = vec![file(
            "a.sysml",
            "package A {\n import ScalarValues;\n part def X :> Base {}\n}",
        )];
        let patterns = LangPatterns::new();
        assert!(check_references(&files, &patterns).is_empty());
    }

    #[test]
    fn test_unresolved_specialization_flagged() {
        let files = vec![file("a.sysml", "package A {\n part def X :> Ghost {}\n}")];
        let patterns = LangPatterns::new();
        let missing = check_references(&files, &patterns);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].kind, ReferenceKind::Specialization);
        assert_eq!(missing[0].symbol, "Ghost");
    }

    #[test]
    fn test_lowercase_specialization_targets_skipped() {
        let files = vec![file("a.sysml", "package A {\n part x :> parts {}\n}")];
        let patterns = LangPatterns::new();
        assert!(check_references(&files, &patterns).is_empty());
    }

    #[test]
    fn test_duplicate_references_reported_once_per_file() {
        let files = vec![file(
            "a.sysml",
            "package A {\n import Ghost;\n import Ghost;\n}",
        )];
        let patterns = LangPatterns::new();
        assert_eq!(check_references(&files, &patterns).len(), 1);
    }
}
