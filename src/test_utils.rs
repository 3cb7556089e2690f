//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::tree::{Node, new_serial_file};

/// A temporary directory tree for testing.
///
/// The directory is removed when the value is dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create a directory and any missing parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a symbolic link at `link` pointing to `target` (stored verbatim).
    #[cfg(unix)]
    pub fn add_symlink(&self, target: &str, link: &str) -> PathBuf {
        let full_path = self.dir.path().join(link);
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Build the tree rooted at this directory.
    pub fn open(&self, include_hidden: bool) -> Node {
        let metadata = fs::metadata(self.path()).expect("Failed to stat root");
        new_serial_file(self.path(), include_hidden, &metadata).expect("Failed to open tree")
    }

    /// Populate the fixture used by most traversal tests:
    /// regular files, empty files, nested and hidden entries.
    pub fn with_sample() -> Self {
        let tree = Self::new();
        tree.add_file("1", "Some text!\n");
        tree.add_file("2", "beep");
        tree.add_dir("3");
        tree.add_file("4", "boop");
        tree.add_file("5/a", "foobar");
        tree.add_file(".6", "thing");
        tree.add_file("7/.foo", "bla");
        tree.add_file(".8/foo", "bla");
        tree
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
