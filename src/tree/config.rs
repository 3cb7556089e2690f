//! Configuration for building filesystem trees

use std::path::PathBuf;

use super::filter::Filter;
use crate::error::Result;

/// What to leave out of a tree.
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Keep paths whose last segment starts with `.`
    pub include_hidden: bool,
    /// A gitignore-style file whose rules are applied before `ignore_patterns`
    pub ignore_file: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
}

impl TreeConfig {
    /// Compile the configured rules into a [`Filter`].
    pub fn build_filter(&self) -> Result<Filter> {
        Filter::new(
            self.ignore_file.as_deref(),
            self.ignore_patterns.as_slice(),
            self.include_hidden,
        )
    }
}
