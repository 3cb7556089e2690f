//! serialtree - lazy, depth-first filesystem trees
//!
//! Build a [`Node`] for a path with [`SerialTree`] (or [`tree::open`]) and
//! drive it with [`walk`]. Directories produce their children one at a time,
//! so a walk holds open handles only along the current path.

pub mod error;
pub mod output;
pub mod stats;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use output::{JsonLinesFormatter, NodeOutput, NodeRecord, OutputConfig, StreamingFormatter};
pub use stats::{StatsCollector, TreeStats, print_stats, print_stats_json};
pub use tree::{
    DirEntry, Directory, File, Filter, HandleTracker, Node, NodeKind, SerialTree, Symlink,
    TreeConfig, is_hidden, new_serial_file, new_serial_file_with_filter, walk,
};
