//! Back-reference extraction.
//!
//! A model element claims to document a repository source file through a
//! metadata block whose body assigns a `path` attribute:
//!
//! ```text
//! metadata SourceTrace {
//!     path = "src/auth/login.ts";
//! }
//! ```
//!
//! This module yields the normalized set of claimed source paths, optionally
//! scoped to a subtree of the corpus.

use std::collections::BTreeSet;

use regex::Regex;

use crate::corpus::{extract_block, normalize_path, ModelFile};

/// Extract all back-referenced source paths from one file's content.
pub fn extract_backrefs(content: &str) -> BTreeSet<String> {
    // Fixed literal patterns; compilation cannot fail.
    let metadata = Regex::new(r"(?m)^\s*metadata\b").expect("static pattern");
    let path_assign = Regex::new(r#"path\s*=\s*"([^"]+)""#).expect("static pattern");

    let mut refs = BTreeSet::new();
    for found in metadata.find_iter(content) {
        let Some(body) = extract_block(content, found.start()) else {
            continue;
        };
        for capture in path_assign.captures_iter(body) {
            refs.insert(normalize_path(&capture[1]));
        }
    }
    refs
}

/// Extract back-references from every corpus file whose path falls inside
/// the given subtree: an exact member of `roots`, or under a directory
/// prefix derived from a member's parent directory.
///
/// Scoping is what keeps one cycle's score honest — a file documented in an
/// earlier cycle's subtree must not count toward a later cycle.
pub fn extract_backrefs_in(files: &[ModelFile], roots: &BTreeSet<String>) -> BTreeSet<String> {
    let prefixes: BTreeSet<String> = roots
        .iter()
        .filter_map(|root| {
            root.rsplit_once('/')
                .map(|(dir, _)| format!("{dir}/"))
        })
        .collect();

    let mut refs = BTreeSet::new();
    for file in files {
        let path = normalize_path(&file.path);
        let in_subtree =
            roots.contains(&path) || prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()));
        if in_subtree {
            refs.extend(extract_backrefs(&file.content));
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_backrefs_single() {
        let content = r#"
part def Login {
    metadata SourceTrace {
        path = "src/auth/login.ts";
    }
}
"#;
        let refs = extract_backrefs(content);
        assert_eq!(refs.len(), 1);
        assert!(refs.contains("src/auth/login.ts"));
    }

    #[test]
    fn test_extract_backrefs_normalizes_dot_slash() {
        let content = r#"metadata SourceTrace { path = "./src/a.ts"; }"#;
        let refs = extract_backrefs(content);
        assert!(refs.contains("src/a.ts"));
    }

    #[test]
    fn test_extract_backrefs_multiple_blocks() {
        let content = r#"
metadata SourceTrace { path = "src/a.ts"; }
part def X {}
metadata SourceTrace { path = "src/b.ts"; }
"#;
        let refs = extract_backrefs(content);
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_path_outside_metadata_ignored() {
        let content = r#"part def X { attribute path = "src/a.ts"; }"#;
        assert!(extract_backrefs(content).is_empty());
    }

    #[test]
    fn test_subtree_scoping() {
        let files = vec![
            ModelFile {
                path: "domain/User.sysml".to_string(),
                content: r#"metadata SourceTrace { path = "src/user.ts"; }"#.to_string(),
            },
            ModelFile {
                path: "api/Routes.sysml".to_string(),
                content: r#"metadata SourceTrace { path = "src/routes.ts"; }"#.to_string(),
            },
        ];

        let roots: BTreeSet<String> = ["domain/_index.sysml".to_string()].into_iter().collect();
        let refs = extract_backrefs_in(&files, &roots);
        assert!(refs.contains("src/user.ts"));
        assert!(!refs.contains("src/routes.ts"));
    }

    #[test]
    fn test_exact_root_member_included() {
        let files = vec![ModelFile {
            path: "main.sysml".to_string(),
            content: r#"metadata SourceTrace { path = "src/main.ts"; }"#.to_string(),
        }];
        let roots: BTreeSet<String> = ["main.sysml".to_string()].into_iter().collect();
        let refs = extract_backrefs_in(&files, &roots);
        assert!(refs.contains("src/main.ts"));
    }
}
