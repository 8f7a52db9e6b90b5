//! Corpus primitives: file records, layout constants, path normalization,
//! brace-block extraction, and corpus splitting/scanning.
//!
//! Everything downstream (coverage, validation, diagram extraction) works
//! over the `(path, content)` records produced here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Boundary marker separating files in a concatenated corpus dump.
pub const FILE_MARKER: &str = "// FILE: ";

/// One corpus file. Immutable per analysis pass; keyed by `path` within a
/// single scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelFile {
    /// Model-root-relative path, forward slashes.
    pub path: String,

    pub content: String,
}

/// Fixed on-disk layout of a generated model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLayout {
    /// Model output directory, repo-relative.
    pub model_dir: String,

    /// Manifest file name inside the model directory.
    pub manifest_file: String,

    /// Master index file name at the model root; transitively imports every
    /// package.
    pub master_index: String,

    /// Per-directory index file name.
    pub dir_index: String,
}

impl Default for ModelLayout {
    fn default() -> Self {
        Self {
            model_dir: "model".to_string(),
            manifest_file: "manifest.json".to_string(),
            master_index: "main.sysml".to_string(),
            dir_index: "_index.sysml".to_string(),
        }
    }
}

impl ModelLayout {
    /// Absolute model root under a repository.
    pub fn model_root(&self, repo: &Path) -> PathBuf {
        repo.join(&self.model_dir)
    }

    /// Absolute manifest path under a repository.
    pub fn manifest_path(&self, repo: &Path) -> PathBuf {
        self.model_root(repo).join(&self.manifest_file)
    }

    /// Absolute master index path under a repository.
    pub fn master_index_path(&self, repo: &Path) -> PathBuf {
        self.model_root(repo).join(&self.master_index)
    }

    /// System/index files excluded from orphan detection: the master index,
    /// the manifest, and any per-directory index file.
    pub fn is_system_file(&self, rel_path: &str) -> bool {
        let rel = normalize_path(rel_path);
        rel == self.master_index
            || rel == self.manifest_file
            || rel == self.dir_index
            || rel.ends_with(&format!("/{}", self.dir_index))
    }
}

/// Normalize a path for set-membership comparison: strip a leading `./`
/// and unify separators. `"src/a.ts"` and `"./src/a.ts"` compare equal
/// after normalization.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    unified
        .strip_prefix("./")
        .map(str::to_string)
        .unwrap_or(unified)
}

/// Extract the content of the next brace-delimited block at or after
/// `start`, tracking nesting depth.
///
/// Returns the substring strictly between the first `{` and its matching
/// `}`. Braces inside string literals (`"…"`, backslash escapes honored),
/// line comments (`//`) and block comments (`/* */`) never affect depth —
/// one consistent policy for every consumer.
///
/// Returns `None` when no opening brace exists at or after `start`. When a
/// block is opened but never closed, returns the remainder of the text from
/// the block start; this is deliberate boundary behavior, not an error.
pub fn extract_block(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut i = start.min(bytes.len());
    let mut depth = 0usize;
    let mut open_at = None;
    let mut in_string = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while i < bytes.len() {
        let c = bytes[i];
        if in_line_comment {
            if c == b'\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }
        if in_block_comment {
            if c == b'*' && bytes.get(i + 1) == Some(&b'/') {
                in_block_comment = false;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }
        if in_string {
            if c == b'\\' {
                i += 2;
                continue;
            }
            if c == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' => in_string = true,
            b'/' if bytes.get(i + 1) == Some(&b'/') => in_line_comment = true,
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                in_block_comment = true;
                i += 2;
                continue;
            }
            b'{' => {
                depth += 1;
                if depth == 1 {
                    open_at = Some(i);
                }
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        let open = open_at?;
                        return Some(&text[open + 1..i]);
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    // Unterminated block: remainder from the block start.
    open_at.map(|open| &text[open + 1..])
}

/// Split a concatenated corpus dump into `ModelFile` records on the fixed
/// [`FILE_MARKER`] boundary. Content before the first marker is discarded.
pub fn split_corpus(text: &str) -> Vec<ModelFile> {
    let mut files = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(FILE_MARKER) {
            if let Some((path, lines)) = current.take() {
                files.push(ModelFile {
                    path,
                    content: lines.join("\n"),
                });
            }
            current = Some((normalize_path(rest.trim()), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((path, lines)) = current {
        files.push(ModelFile {
            path,
            content: lines.join("\n"),
        });
    }
    files
}

/// Scan a model tree on disk, collecting `.sysml` files as `ModelFile`
/// records with model-root-relative paths.
///
/// Unreadable files and directories are skipped, never raised: a file this
/// pass cannot read is treated as absent.
pub fn scan_model_tree(root: &Path) -> Vec<ModelFile> {
    let mut files = Vec::new();
    walk_model_dir(root, root, &mut files);
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn walk_model_dir(root: &Path, dir: &Path, out: &mut Vec<ModelFile>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_model_dir(root, &path, out);
        } else if path.extension().is_some_and(|ext| ext == "sysml") {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let rel = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            out.push(ModelFile { path: rel, content });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_strips_dot_slash() {
        assert_eq!(normalize_path("./src/a.ts"), "src/a.ts");
        assert_eq!(normalize_path("src/a.ts"), "src/a.ts");
        assert_eq!(normalize_path("src\\a.ts"), "src/a.ts");
    }

    #[test]
    fn test_extract_block_simple() {
        let text = "part def User { attribute name; }";
        assert_eq!(extract_block(text, 0), Some(" attribute name; "));
    }

    #[test]
    fn test_extract_block_nested() {
        let text = "outer { a { b } c { d } e } trailing";
        assert_eq!(extract_block(text, 0), Some(" a { b } c { d } e "));
    }

    #[test]
    fn test_extract_block_from_offset() {
        let text = "a { one } b { two }";
        let offset = text.find('b').unwrap();
        assert_eq!(extract_block(text, offset), Some(" two "));
    }

    #[test]
    fn test_extract_block_ignores_braces_in_strings() {
        let text = r#"x { path = "dir/{id}"; }"#;
        assert_eq!(extract_block(text, 0), Some(r#" path = "dir/{id}"; "#));
    }

    #[test]
    fn test_extract_block_ignores_braces_in_comments() {
        let text = "x { // not a close }\n y; /* { */ }";
        assert_eq!(extract_block(text, 0), Some(" // not a close }\n y; /* { */ "));
    }

    #[test]
    fn test_extract_block_unterminated_returns_remainder() {
        let text = "part def User { attribute name;";
        assert_eq!(extract_block(text, 0), Some(" attribute name;"));
    }

    #[test]
    fn test_extract_block_no_brace() {
        assert_eq!(extract_block("no braces here", 0), None);
    }

    #[test]
    fn test_split_corpus_on_marker() {
        let dump = "\
// FILE: domain/User.sysml
package User {
}
// FILE: ./domain/Order.sysml
package Order {
}";
        let files = split_corpus(dump);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "domain/User.sysml");
        assert!(files[0].content.contains("package User"));
        // marker paths are normalized
        assert_eq!(files[1].path, "domain/Order.sysml");
    }

    #[test]
    fn test_split_corpus_discards_preamble() {
        let dump = "preamble noise\n// FILE: a.sysml\ncontent";
        let files = split_corpus(dump);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, "content");
    }

    #[test]
    fn test_split_corpus_empty() {
        assert!(split_corpus("").is_empty());
        assert!(split_corpus("no markers at all").is_empty());
    }

    #[test]
    fn test_layout_system_files() {
        let layout = ModelLayout::default();
        assert!(layout.is_system_file("main.sysml"));
        assert!(layout.is_system_file("_index.sysml"));
        assert!(layout.is_system_file("domain/_index.sysml"));
        assert!(layout.is_system_file("./domain/_index.sysml"));
        assert!(!layout.is_system_file("domain/User.sysml"));
    }

    #[test]
    fn test_scan_model_tree_missing_root_is_empty() {
        let files = scan_model_tree(Path::new("/nonexistent/model"));
        assert!(files.is_empty());
    }
}
