//! Path exclusion: hidden-file policy plus gitignore-style rules

use std::fs;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;

use crate::error::{Error, Result};

/// Decides which relative paths are left out of a tree.
///
/// Paths are always relative to the tree root and `/`-separated. The filter is
/// immutable once built and can be shared by every node of a tree.
#[derive(Debug, Clone)]
pub struct Filter {
    rules: Gitignore,
    include_hidden: bool,
}

impl Filter {
    /// Compile a filter from an optional ignore file plus explicit rules.
    ///
    /// When `ignore_file` is given its lines come first, followed by `rules`.
    /// An unreadable file or a malformed rule is reported here and nowhere else.
    pub fn new<S: AsRef<str>>(
        ignore_file: Option<&Path>,
        rules: &[S],
        include_hidden: bool,
    ) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(".");

        if let Some(path) = ignore_file {
            let contents = fs::read_to_string(path).map_err(|source| Error::IgnoreFile {
                path: path.to_path_buf(),
                source,
            })?;
            for line in contents.lines() {
                builder
                    .add_line(Some(path.to_path_buf()), line)
                    .map_err(|source| Error::IgnoreRule { source })?;
            }
        }

        for rule in rules {
            builder
                .add_line(None, rule.as_ref())
                .map_err(|source| Error::IgnoreRule { source })?;
        }

        let rules = builder
            .build()
            .map_err(|source| Error::IgnoreRule { source })?;
        debug!(
            rules = rules.num_ignores() + rules.num_whitelists(),
            include_hidden, "compiled path filter"
        );

        Ok(Self {
            rules,
            include_hidden,
        })
    }

    /// A filter with no rules that only applies the hidden-path policy.
    pub fn hidden_only(include_hidden: bool) -> Self {
        Self {
            rules: Gitignore::empty(),
            include_hidden,
        }
    }

    /// Whether hidden paths are kept.
    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Returns true if `path` should be excluded.
    ///
    /// The path is matched as a non-directory; use [`Filter::exclude_entry`]
    /// when the entry type is known so that `dir/` rules apply.
    pub fn exclude(&self, path: &str) -> bool {
        self.exclude_entry(path, false)
    }

    /// Returns true if the entry at `path` should be excluded.
    pub fn exclude_entry(&self, path: &str, is_dir: bool) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return true;
        }
        self.matches_rules(path, is_dir)
    }

    fn matches_rules(&self, path: &str, is_dir: bool) -> bool {
        // a leading `/` still names a path under the root
        let path = path.trim_matches('/');
        if path.is_empty() || path == "." {
            return false;
        }
        self.rules
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::hidden_only(false)
    }
}

/// Whether the last segment of `path` marks it as hidden.
///
/// The segment must start with `.` and be neither empty nor exactly `.`.
pub fn is_hidden(path: &str) -> bool {
    let base = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    base != "." && base.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_RULES: &[&str] = &[];

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden("a/.b"));
        assert!(is_hidden(".git"));
        assert!(is_hidden(".8/"));
        assert!(is_hidden(".."));
        assert!(!is_hidden("."));
        assert!(!is_hidden(""));
        assert!(!is_hidden(".a/b"));
        assert!(!is_hidden("a.b"));
        assert!(!is_hidden("./a"));
    }

    #[test]
    fn test_hidden_policy_without_rules() {
        let filter = Filter::new(None, NO_RULES, false).unwrap();
        assert!(filter.exclude(".git"));
        assert!(filter.exclude("7/.foo"));
        assert!(!filter.exclude("README"));
        assert!(!filter.exclude(""));

        let filter = Filter::new(None, NO_RULES, true).unwrap();
        assert!(!filter.exclude(".git"));
    }

    #[test]
    fn test_rules_match_relative_paths() {
        let filter = Filter::new(None, &["*.log", "/build", "docs/*.tmp"], false).unwrap();
        assert!(filter.exclude("debug.log"));
        assert!(filter.exclude("nested/deeper/debug.log"));
        assert!(filter.exclude("build"));
        assert!(filter.exclude("build/output.bin"));
        assert!(!filter.exclude("src/build"));
        assert!(filter.exclude("docs/a.tmp"));
        assert!(!filter.exclude("a.tmp"));
        assert!(!filter.exclude("main.rs"));
    }

    #[test]
    fn test_rooted_paths_match_like_relative_ones() {
        let filter = Filter::new(None, &["*.log", "/build"], false).unwrap();
        assert!(filter.exclude("/x.log"));
        assert!(filter.exclude("/build/out"));
        assert!(filter.exclude_entry("//build/", true));
        assert!(!filter.exclude("/main.rs"));
        assert!(!filter.exclude("/"));
    }

    #[test]
    fn test_allowed_hidden_paths_still_consult_rules() {
        let filter = Filter::new(None, &[".env"], true).unwrap();
        assert!(filter.exclude(".env"));
        assert!(!filter.exclude(".gitignore"));
    }

    #[test]
    fn test_negated_rule_reincludes() {
        let filter = Filter::new(None, &["*.log", "!keep.log"], false).unwrap();
        assert!(filter.exclude("drop.log"));
        assert!(!filter.exclude("keep.log"));
    }

    #[test]
    fn test_directory_only_rule() {
        let filter = Filter::new(None, &["target/"], false).unwrap();
        assert!(filter.exclude_entry("target", true));
        assert!(!filter.exclude_entry("target", false));
        assert!(filter.exclude("target/debug/app"));
    }

    #[test]
    fn test_ignore_file_and_explicit_rules_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let ignore_path = dir.path().join(".gitignore");
        fs::write(&ignore_path, "# comment\n*.o\n\n").unwrap();

        let filter = Filter::new(Some(&ignore_path), &["*.a"], false).unwrap();
        assert!(filter.exclude("main.o"));
        assert!(filter.exclude("lib.a"));
        assert!(!filter.exclude("main.c"));
    }

    #[test]
    fn test_missing_ignore_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Filter::new(Some(&missing), NO_RULES, false).unwrap_err();
        assert!(matches!(err, Error::IgnoreFile { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_malformed_rule_is_an_error() {
        let err = Filter::new(None, &["a[b"], false).unwrap_err();
        assert!(matches!(err, Error::IgnoreRule { .. }));
    }
}
