//! File tree model for the analysis workflow
//!
//! Hierarchical listing of repository entries as returned by the backend.
//! Every walk over the tree uses an explicit stack, so pathological depth
//! never exhausts the call stack.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ═══════════════════════════════════════════════════════════════════════════════
// Entry Kind
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether an entry is a file leaf or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[serde(alias = "File", alias = "blob")]
    File,
    #[serde(alias = "Directory", alias = "dir", alias = "tree")]
    Directory,
}

// ═══════════════════════════════════════════════════════════════════════════════
// File Entry
// ═══════════════════════════════════════════════════════════════════════════════

/// A node in the repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File or directory name
    pub name: String,
    /// Full path from repository root, unique across the tree
    pub path: String,
    /// File or directory
    #[serde(rename = "type", alias = "kind")]
    pub kind: EntryKind,
    /// Children (directories only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileEntry>,
}

impl FileEntry {
    /// Create a new file entry
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            children: Vec::new(),
        }
    }

    /// Create a new directory entry
    pub fn dir(name: impl Into<String>, path: impl Into<String>, children: Vec<FileEntry>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
            children,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

// Dropping a deeply nested entry must not recurse once per level.
impl Drop for FileEntry {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut entry) = pending.pop() {
            pending.append(&mut entry.children);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Flattened Entry (for rendering)
// ═══════════════════════════════════════════════════════════════════════════════

/// A flattened view of one tree entry, in depth-first order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub depth: usize,
    pub has_children: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════════════════

/// A backend payload that violates the tree invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("duplicate path in file tree: {0}")]
    DuplicatePath(String),
    #[error("file entry has children: {0}")]
    FileWithChildren(String),
    #[error("entry `{0}` has an empty path")]
    EmptyPath(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// File Tree
// ═══════════════════════════════════════════════════════════════════════════════

/// The active repository tree plus an index of its file paths
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    /// Root entries in backend order
    roots: Vec<FileEntry>,
    /// Every file path reachable in `roots`
    files: HashSet<String>,
}

impl FileTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and index a backend listing
    pub fn from_entries(entries: Vec<FileEntry>) -> Result<Self, TreeError> {
        let files = index_files(&entries)?;
        Ok(Self {
            roots: entries,
            files,
        })
    }

    /// Replace the whole tree with a new listing
    pub fn replace(&mut self, entries: Vec<FileEntry>) -> Result<(), TreeError> {
        *self = Self::from_entries(entries)?;
        Ok(())
    }

    /// Root entries in backend order
    pub fn roots(&self) -> &[FileEntry] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `path` names a file (not a directory) in this tree
    pub fn is_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Number of file leaves
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Lazy depth-first walk over every file path, in stored order
    ///
    /// Calling it again restarts the walk from the first root.
    pub fn all_file_paths(&self) -> FilePaths<'_> {
        FilePaths {
            stack: vec![self.roots.iter()],
        }
    }

    /// Look up an entry (file or directory) by path
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        let mut stack: Vec<&FileEntry> = self.roots.iter().collect();
        while let Some(entry) = stack.pop() {
            if entry.path == path {
                return Some(entry);
            }
            stack.extend(entry.children.iter());
        }
        None
    }

    /// Depth-annotated listing of every entry, in depth-first order
    pub fn flatten(&self) -> Vec<FlatEntry> {
        let mut flat = Vec::new();
        let mut stack: Vec<(&FileEntry, usize)> = self.roots.iter().rev().map(|e| (e, 0)).collect();

        while let Some((entry, depth)) = stack.pop() {
            flat.push(FlatEntry {
                name: entry.name.clone(),
                path: entry.path.clone(),
                kind: entry.kind,
                depth,
                has_children: !entry.children.is_empty(),
            });
            stack.extend(entry.children.iter().rev().map(|child| (child, depth + 1)));
        }

        flat
    }
}

/// Check the tree invariants and collect every file path
fn index_files(entries: &[FileEntry]) -> Result<HashSet<String>, TreeError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut files = HashSet::new();
    let mut stack: Vec<&FileEntry> = entries.iter().collect();

    while let Some(entry) = stack.pop() {
        if entry.path.is_empty() {
            return Err(TreeError::EmptyPath(entry.name.clone()));
        }
        if !seen.insert(entry.path.as_str()) {
            return Err(TreeError::DuplicatePath(entry.path.clone()));
        }
        match entry.kind {
            EntryKind::File => {
                if !entry.children.is_empty() {
                    return Err(TreeError::FileWithChildren(entry.path.clone()));
                }
                files.insert(entry.path.clone());
            }
            EntryKind::Directory => stack.extend(entry.children.iter()),
        }
    }

    Ok(files)
}

/// Iterator over file paths, see [`FileTree::all_file_paths`]
pub struct FilePaths<'a> {
    stack: Vec<std::slice::Iter<'a, FileEntry>>,
}

impl<'a> Iterator for FilePaths<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(entry) if entry.is_dir() => self.stack.push(entry.children.iter()),
                Some(entry) => return Some(entry.path.as_str()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FileTree {
        FileTree::from_entries(vec![
            FileEntry::file("a.ts", "a.ts"),
            FileEntry::dir(
                "src",
                "src",
                vec![
                    FileEntry::file("b.ts", "src/b.ts"),
                    FileEntry::dir("util", "src/util", vec![FileEntry::file("c.ts", "src/util/c.ts")]),
                    FileEntry::dir("empty", "src/empty", Vec::new()),
                    FileEntry::file("d.ts", "src/d.ts"),
                ],
            ),
            FileEntry::file("z.md", "z.md"),
        ])
        .expect("sample tree is valid")
    }

    #[test]
    fn all_file_paths_is_depth_first_and_files_only() {
        let tree = sample_tree();
        let paths: Vec<_> = tree.all_file_paths().collect();
        assert_eq!(
            paths,
            vec!["a.ts", "src/b.ts", "src/util/c.ts", "src/d.ts", "z.md"]
        );
        assert_eq!(tree.file_count(), paths.len());
    }

    #[test]
    fn all_file_paths_restarts() {
        let tree = sample_tree();
        let first: Vec<_> = tree.all_file_paths().collect();
        let second: Vec<_> = tree.all_file_paths().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_tree_has_no_paths() {
        let tree = FileTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.all_file_paths().count(), 0);

        let dirs_only = FileTree::from_entries(vec![FileEntry::dir("docs", "docs", Vec::new())])
            .expect("valid tree");
        assert_eq!(dirs_only.all_file_paths().count(), 0);
        assert_eq!(dirs_only.file_count(), 0);
    }

    #[test]
    fn deep_tree_does_not_overflow() {
        const DEPTH: usize = 100_000;
        let mut node = FileEntry::file("leaf.rs", "leaf.rs");
        for level in 0..DEPTH {
            let path = format!("d{level}");
            node = FileEntry::dir(path.clone(), path, vec![node]);
        }

        let tree = FileTree::from_entries(vec![node]).expect("deep tree is valid");
        let paths: Vec<_> = tree.all_file_paths().collect();
        assert_eq!(paths, vec!["leaf.rs"]);
        assert_eq!(tree.flatten().len(), DEPTH + 1);
        assert!(tree.find("leaf.rs").is_some());
    }

    #[test]
    fn rejects_duplicate_paths() {
        let err = FileTree::from_entries(vec![
            FileEntry::file("a", "a"),
            FileEntry::dir("d", "d", vec![FileEntry::file("a", "a")]),
        ])
        .expect_err("duplicate path must be rejected");
        assert_eq!(err, TreeError::DuplicatePath("a".to_string()));
    }

    #[test]
    fn rejects_file_with_children() {
        let mut bogus = FileEntry::file("a", "a");
        bogus.children.push(FileEntry::file("b", "a/b"));
        let err = FileTree::from_entries(vec![bogus]).expect_err("file with children");
        assert_eq!(err, TreeError::FileWithChildren("a".to_string()));
    }

    #[test]
    fn rejects_empty_path() {
        let err = FileTree::from_entries(vec![FileEntry::file("a", "")]).expect_err("empty path");
        assert_eq!(err, TreeError::EmptyPath("a".to_string()));
    }

    #[test]
    fn is_file_distinguishes_directories() {
        let tree = sample_tree();
        assert!(tree.is_file("src/b.ts"));
        assert!(!tree.is_file("src"));
        assert!(!tree.is_file("missing.ts"));
        assert!(tree.find("src").is_some_and(FileEntry::is_dir));
    }

    #[test]
    fn flatten_tracks_depth() {
        let tree = sample_tree();
        let flat = tree.flatten();
        let summary: Vec<_> = flat.iter().map(|e| (e.path.as_str(), e.depth)).collect();
        assert_eq!(
            summary,
            vec![
                ("a.ts", 0),
                ("src", 0),
                ("src/b.ts", 1),
                ("src/util", 1),
                ("src/util/c.ts", 2),
                ("src/empty", 1),
                ("src/d.ts", 1),
                ("z.md", 0),
            ]
        );
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"[
            {"name": "a.ts", "path": "a.ts", "type": "file"},
            {"name": "src", "path": "src", "type": "directory", "children": [
                {"name": "b.ts", "path": "src/b.ts", "kind": "File"}
            ]}
        ]"#;
        let entries: Vec<FileEntry> = serde_json::from_str(json).expect("valid listing");
        let tree = FileTree::from_entries(entries).expect("valid tree");
        assert_eq!(tree.all_file_paths().collect::<Vec<_>>(), vec!["a.ts", "src/b.ts"]);
    }

    #[test]
    fn replace_resets_tree_identity() {
        let mut tree = sample_tree();
        tree.replace(vec![FileEntry::file("new.rs", "new.rs")])
            .expect("valid replacement");
        assert_eq!(tree.all_file_paths().collect::<Vec<_>>(), vec!["new.rs"]);
        assert!(!tree.is_file("a.ts"));
    }
}
