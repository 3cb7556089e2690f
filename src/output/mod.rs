//! Formatting of walked nodes
//!
//! - `streaming` - indented, coloured listing written as nodes are visited
//! - `json` - one JSON object per node (JSON lines)
//!
//! Both implement [`NodeOutput`], so the CLI drives them from a single
//! [`walk`](crate::tree::walk) visitor.

mod config;
mod json;
mod streaming;

use std::io;

use serde::Serialize;

use crate::stats::TreeStats;
use crate::tree::{Node, NodeKind};

pub use config::OutputConfig;
pub use json::JsonLinesFormatter;
pub use streaming::StreamingFormatter;

/// Receives each visited node, in walk order.
pub trait NodeOutput {
    fn output_node(&mut self, record: &NodeRecord) -> io::Result<()>;

    fn finish(&mut self, stats: &TreeStats) -> io::Result<()>;
}

/// What the formatters know about one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl NodeRecord {
    /// Describe `node`, visited at `path`. Directory sizes are left out since
    /// computing them rescans the subtree.
    pub fn new(path: &str, node: &Node) -> Self {
        let (size, target) = match node {
            Node::File(file) => (Some(file.size()), None),
            Node::Directory(_) => (None, None),
            Node::Symlink(link) => (None, Some(link.target().to_string())),
        };
        Self {
            path: path.to_string(),
            kind: node.kind(),
            size,
            target,
        }
    }

    /// Nesting level below the root; the root is 0.
    pub fn depth(&self) -> usize {
        if self.path.is_empty() {
            0
        } else {
            self.path.matches('/').count() + 1
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}
