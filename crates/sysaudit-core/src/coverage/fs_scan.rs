//! Repository filesystem scanning and pattern expansion.
//!
//! All functions treat unreadable files and directories as absent; an I/O
//! failure at any single entry never fails the surrounding pass.

use std::collections::BTreeSet;
use std::path::Path;

use crate::corpus::{normalize_path, ModelLayout};

use super::{EXCLUDED_FILES, FIXTURE_DIRS, IGNORED_DIRS, SOURCE_EXTENSIONS};

/// True when a pattern contains glob metacharacters; anything else is
/// treated as a literal path.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

fn is_ignored_dir(name: &str, layout: &ModelLayout) -> bool {
    IGNORED_DIRS.contains(&name) || name == layout.model_dir
}

fn path_enters_ignored_dir(rel: &str, layout: &ModelLayout) -> bool {
    rel.split('/').any(|segment| is_ignored_dir(segment, layout))
}

/// Discover all repository source files: fixed extension set, fixed ignore
/// list, lockfiles and fixture directories excluded. Paths are repo-relative
/// and normalized; the result is sorted by `BTreeSet` ordering.
pub fn discover_source_files(repo: &Path, layout: &ModelLayout) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    walk_sources(repo, repo, layout, &mut found);
    found
}

fn walk_sources(repo: &Path, dir: &Path, layout: &ModelLayout, out: &mut BTreeSet<String>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_dir() {
            if is_ignored_dir(&name, layout) || FIXTURE_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk_sources(repo, &path, layout, out);
        } else {
            if EXCLUDED_FILES.contains(&name.as_str()) {
                continue;
            }
            let has_source_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e));
            if !has_source_ext {
                continue;
            }
            let rel = path
                .strip_prefix(repo)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            out.insert(normalize_path(&rel));
        }
    }
}

/// Expand a cycle's declared source patterns against the live filesystem.
///
/// Literal paths are existence-checked; glob patterns are expanded relative
/// to the repository root under the fixed ignore set. The result is the
/// deduplicated, sorted set of repo-relative matches.
pub fn expand_patterns(
    repo: &Path,
    patterns: &[String],
    layout: &ModelLayout,
) -> BTreeSet<String> {
    let mut matched = BTreeSet::new();
    for pattern in patterns {
        if is_glob_pattern(pattern) {
            matched.extend(expand_glob(repo, pattern, layout));
        } else {
            let literal = normalize_path(pattern);
            if repo.join(&literal).is_file() {
                matched.insert(literal);
            }
        }
    }
    matched
}

fn expand_glob(repo: &Path, pattern: &str, layout: &ModelLayout) -> BTreeSet<String> {
    let absolute = repo.join(normalize_path(pattern));
    let Some(pattern_str) = absolute.to_str() else {
        return BTreeSet::new();
    };
    let Ok(paths) = glob::glob(pattern_str) else {
        return BTreeSet::new();
    };

    let mut matched = BTreeSet::new();
    for path in paths.flatten() {
        if !path.is_file() {
            continue;
        }
        let rel = path
            .strip_prefix(repo)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        let rel = normalize_path(&rel);
        if path_enters_ignored_dir(&rel, layout) {
            continue;
        }
        matched.insert(rel);
    }
    matched
}
