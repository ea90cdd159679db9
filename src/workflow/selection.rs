//! File selection for analysis
//!
//! Owns the active [`FileTree`] together with the set of chosen file paths so
//! the two can never drift apart: installing a new tree immediately drops any
//! selected path that no longer names a file.

use std::collections::HashSet;

use super::file_tree::FileTree;
use crate::error::ValidationError;

/// The active tree and the files chosen from it
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    tree: FileTree,
    selected: HashSet<String>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active tree
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Install a new tree, discarding selections that no longer resolve
    pub fn replace(&mut self, tree: FileTree) {
        self.tree = tree;
        let tree = &self.tree;
        self.selected.retain(|path| tree.is_file(path));
    }

    /// Drop the tree and the selection
    pub fn clear(&mut self) {
        self.tree = FileTree::new();
        self.selected.clear();
    }

    /// Include or exclude one file
    ///
    /// Returns `false` without touching the selection when `path` is not a
    /// file in the active tree (directories included).
    pub fn toggle(&mut self, path: &str, included: bool) -> bool {
        if !self.tree.is_file(path) {
            return false;
        }
        if included {
            self.selected.insert(path.to_string());
        } else {
            self.selected.remove(path);
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selected = self.tree.all_file_paths().map(str::to_string).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// True iff the selection is exactly the set of files in the tree
    pub fn is_all_selected(&self) -> bool {
        // Sizes alone are not enough: a stale path could pad the count.
        self.selected.len() == self.tree.file_count()
            && self.selected.iter().all(|path| self.tree.is_file(path))
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected paths in tree (depth-first) order
    pub fn selected_paths(&self) -> Vec<String> {
        self.tree
            .all_file_paths()
            .filter(|path| self.selected.contains(*path))
            .map(str::to_string)
            .collect()
    }

    /// The selection to submit, or `EmptySelection`
    pub fn validate_for_submission(&self) -> Result<Vec<String>, ValidationError> {
        let paths = self.selected_paths();
        if paths.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        Ok(paths)
    }
}
