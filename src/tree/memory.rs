//! Nodes that live in memory rather than on disk

use std::collections::{BTreeMap, VecDeque};
use std::io::{Cursor, Read};

use super::node::{DirEntry, DirSource, Directory, File, Node, Symlink};
use crate::error::{Error, Result};

impl Node {
    /// A file node serving `data`.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Node::File(File::from_bytes(data))
    }

    pub fn symlink(target: impl Into<String>) -> Self {
        Node::Symlink(Symlink::new(target))
    }

    /// A directory node over the given children. See [`Directory::from_entries`].
    pub fn directory<S: Into<String>>(entries: Vec<(S, Node)>) -> Result<Self> {
        Directory::from_entries(entries).map(Node::Directory)
    }
}

impl File {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        File::new(Box::new(Cursor::new(data)), size, None, None)
    }

    /// Wrap any reader; `size` is reported as-is.
    pub fn from_reader<R: Read + Send + 'static>(reader: R, size: u64) -> Self {
        File::new(Box::new(reader), size, None, None)
    }
}

impl Directory {
    /// A directory yielding `entries` in name order.
    ///
    /// Fails with [`Error::DuplicateEntry`] if two entries share a name.
    pub fn from_entries<S: Into<String>>(entries: Vec<(S, Node)>) -> Result<Self> {
        let mut sorted = BTreeMap::new();
        for (name, node) in entries {
            let name = name.into();
            if sorted.contains_key(&name) {
                return Err(Error::DuplicateEntry { name });
            }
            sorted.insert(name, node);
        }
        let entries = sorted
            .into_iter()
            .map(|(name, node)| DirEntry { name, node })
            .collect();
        Ok(Directory::new(Box::new(MemoryDir { entries }), None))
    }
}

struct MemoryDir {
    entries: VecDeque<DirEntry>,
}

impl DirSource for MemoryDir {
    fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        Ok(self.entries.pop_front())
    }

    fn size(&self) -> Result<u64> {
        self.entries.iter().try_fold(0u64, |total, entry| {
            let size = match &entry.node {
                Node::Symlink(_) => 0,
                node => node.size()?,
            };
            Ok(total + size)
        })
    }
}
