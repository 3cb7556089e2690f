//! Test harness for serialtree integration tests

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

pub use serialtree::test_utils::TestTree;

/// Run the built binary in `dir`, returning (stdout, stderr, success).
pub fn run_serialtree(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_serialtree");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run serialtree");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Lines of the listing with indentation removed.
pub fn listed_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .take_while(|line| !line.is_empty())
        .map(|line| line.trim_start().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let tree = TestTree::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_harness_add_file() {
        let tree = TestTree::new();
        let file_path = tree.add_file("nested/test.rs", "fn main() {}");
        assert!(file_path.exists());
    }

    #[test]
    fn test_listed_names_stops_at_summary() {
        let names = listed_names(".\n  a\n    b\n\n1 directories, 2 files, 0 symlinks\n");
        assert_eq!(names, [".", "a", "b"]);
    }
}
