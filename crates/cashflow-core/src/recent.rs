//! Most-recently-used budget files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default number of files remembered.
pub const DEFAULT_LIMIT: usize = 5;

/// Recent files, most recent first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentFiles {
    files: Vec<PathBuf>,
    limit: usize,
}

impl RecentFiles {
    pub fn new(limit: usize) -> Self {
        Self {
            files: Vec::new(),
            limit,
        }
    }

    /// Rebuild from a stored list, applying the limit.
    pub fn from_files(files: Vec<PathBuf>, limit: usize) -> Self {
        let mut recent = Self::new(limit);
        for file in files.into_iter().rev() {
            recent.add(file);
        }
        recent
    }

    /// Move `path` to the front, dropping the oldest entries past the limit.
    pub fn add(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.files.retain(|existing| existing != path);
        self.files.insert(0, path.to_path_buf());
        self.files.truncate(self.limit);
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_moves_to_front_without_duplicates() {
        let mut recent = RecentFiles::default();
        recent.add("a.cashflow");
        recent.add("b.cashflow");
        recent.add("a.cashflow");

        assert_eq!(
            recent.files(),
            &[PathBuf::from("a.cashflow"), PathBuf::from("b.cashflow")]
        );
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut recent = RecentFiles::new(2);
        for name in ["a", "b", "c"] {
            recent.add(name);
        }
        assert_eq!(recent.files(), &[PathBuf::from("c"), PathBuf::from("b")]);
    }

    #[test]
    fn test_from_files_keeps_order() {
        let recent = RecentFiles::from_files(
            vec![PathBuf::from("new"), PathBuf::from("old"), PathBuf::from("new")],
            5,
        );
        assert_eq!(recent.files(), &[PathBuf::from("new"), PathBuf::from("old")]);
    }
}
