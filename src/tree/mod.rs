//! Lazily constructed trees and their traversal
//!
//! - [`Node`]: a file, directory or symlink, built only when the traversal
//!   reaches it
//! - [`SerialTree`]: builds nodes from the filesystem, consulting a [`Filter`]
//! - [`walk`]: depth-first traversal over any root node

mod config;
mod filter;
mod handles;
mod memory;
mod node;
mod serial;
mod utils;
mod walk;

use std::fs;
use std::path::Path;

// Re-export public types
pub use config::TreeConfig;
pub use filter::{Filter, is_hidden};
pub use handles::HandleTracker;
pub use node::{DirEntry, Directory, Entries, File, Node, NodeKind, Symlink};
pub use serial::{SerialTree, new_serial_file, new_serial_file_with_filter};
pub use utils::{format_size, join_relative};
pub use walk::walk;

use crate::error::{Error, Result};

/// Stat `path` without following a final symlink and build its tree.
pub fn open(path: impl AsRef<Path>, config: &TreeConfig) -> Result<Node> {
    let path = path.as_ref();
    let metadata = fs::symlink_metadata(path).map_err(|source| Error::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    let filter = config.build_filter()?;
    SerialTree::new(config.include_hidden)
        .with_filter(filter)
        .open(path, &metadata)
}
