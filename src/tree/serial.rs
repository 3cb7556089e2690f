//! Filesystem-backed trees
//!
//! [`SerialTree`] turns a path and its metadata into a [`Node`]. Directories
//! list their entry names when built but only construct a child node when
//! the traversal asks for it, so open handles stay bounded by the depth of
//! the walk rather than the size of the tree.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs::{self, FileType, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use super::filter::{Filter, is_hidden};
use super::handles::{HandleGuard, HandleTracker};
use super::node::{DirEntry, DirSource, Directory, File, Node, Symlink};
use super::utils::join_relative;
use crate::error::{Error, Result};

/// Builds filesystem-backed trees.
#[derive(Debug, Clone, Default)]
pub struct SerialTree {
    include_hidden: bool,
    filter: Option<Filter>,
    tracker: Option<HandleTracker>,
}

impl SerialTree {
    pub fn new(include_hidden: bool) -> Self {
        Self {
            include_hidden,
            filter: None,
            tracker: None,
        }
    }

    /// Exclude paths matched by `filter`. The filter's hidden-path policy
    /// replaces the one given to [`SerialTree::new`].
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.include_hidden = filter.include_hidden();
        self.filter = Some(filter);
        self
    }

    /// Count every handle the tree opens.
    pub fn with_tracker(mut self, tracker: HandleTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Build the root node for `root`, classified by `metadata`.
    ///
    /// `metadata` is trusted as given: pass `fs::symlink_metadata` to get a
    /// [`Symlink`] for a link root, or `fs::metadata` to build what it points at.
    pub fn open(&self, root: impl AsRef<Path>, metadata: &Metadata) -> Result<Node> {
        let root = root.as_ref();
        debug!(root = %root.display(), "building tree");
        let shared = Arc::new(Shared {
            include_hidden: self.include_hidden,
            filter: self.filter.clone(),
            tracker: self.tracker.clone(),
        });
        build_node(&shared, root.to_path_buf(), String::new(), metadata)
    }
}

/// Build the node for `root` from a caller-supplied stat result.
pub fn new_serial_file(
    root: impl AsRef<Path>,
    include_hidden: bool,
    metadata: &Metadata,
) -> Result<Node> {
    SerialTree::new(include_hidden).open(root, metadata)
}

/// Like [`new_serial_file`], excluding whatever `filter` excludes.
pub fn new_serial_file_with_filter(
    root: impl AsRef<Path>,
    filter: Filter,
    metadata: &Metadata,
) -> Result<Node> {
    SerialTree::new(filter.include_hidden())
        .with_filter(filter)
        .open(root, metadata)
}

/// Settings shared by every node of one tree.
#[derive(Debug)]
struct Shared {
    include_hidden: bool,
    filter: Option<Filter>,
    tracker: Option<HandleTracker>,
}

impl Shared {
    fn excludes(&self, relative: &str, is_dir: bool) -> bool {
        if !self.include_hidden && is_hidden(relative) {
            return true;
        }
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.exclude_entry(relative, is_dir))
    }

    fn acquire(&self) -> Option<HandleGuard> {
        self.tracker.as_ref().map(HandleTracker::acquire)
    }
}

fn build_node(
    shared: &Arc<Shared>,
    path: PathBuf,
    relative: String,
    metadata: &Metadata,
) -> Result<Node> {
    let file_type = metadata.file_type();

    if file_type.is_dir() {
        let entries = list_entries(shared, &path)?;
        let source = SerialDir {
            shared: Arc::clone(shared),
            path: path.clone(),
            relative,
            entries,
        };
        return Ok(Node::Directory(Directory::new(Box::new(source), Some(path))));
    }

    if file_type.is_symlink() {
        let target = fs::read_link(&path).map_err(|source| Error::ReadLink {
            path: path.clone(),
            source,
        })?;
        let target = target
            .into_os_string()
            .into_string()
            .map_err(|_| Error::InvalidLinkTarget { path: path.clone() })?;
        return Ok(Node::Symlink(Symlink::new(target)));
    }

    let file = fs::File::open(&path).map_err(|source| Error::Open {
        path: path.clone(),
        source,
    })?;
    let handle = shared.acquire();
    Ok(Node::File(File::new(
        Box::new(file),
        metadata.len(),
        Some(path),
        handle,
    )))
}

/// Read every entry name and type in `path`, sorted by name.
///
/// The enumeration handle is released before returning.
fn list_entries(shared: &Shared, path: &Path) -> Result<VecDeque<(OsString, FileType)>> {
    let _handle = shared.acquire();
    let read_dir = fs::read_dir(path).map_err(|source| Error::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| Error::ReadDirEntry {
            path: path.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| Error::Metadata {
            path: entry.path(),
            source,
        })?;
        entries.push((entry.file_name(), file_type));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    trace!(path = %path.display(), count = entries.len(), "listed directory");
    Ok(entries.into())
}

/// Total bytes of regular files below `path` that the tree would include.
fn disk_usage(shared: &Shared, path: &Path, relative: &str) -> Result<u64> {
    let mut total = 0;
    for (os_name, file_type) in list_entries(shared, path)? {
        let child = path.join(&os_name);
        let name = utf8_name(os_name, &child)?;
        let child_relative = join_relative(relative, &name);
        if shared.excludes(&child_relative, file_type.is_dir()) {
            continue;
        }
        if file_type.is_dir() {
            total += disk_usage(shared, &child, &child_relative)?;
        } else if file_type.is_file() {
            let metadata = fs::symlink_metadata(&child).map_err(|source| Error::Metadata {
                path: child.clone(),
                source,
            })?;
            total += metadata.len();
        }
    }
    Ok(total)
}

fn utf8_name(name: OsString, path: &Path) -> Result<String> {
    name.into_string().map_err(|_| Error::InvalidName {
        path: path.to_path_buf(),
    })
}

struct SerialDir {
    shared: Arc<Shared>,
    path: PathBuf,
    relative: String,
    entries: VecDeque<(OsString, FileType)>,
}

impl SerialDir {
    fn build_child(&self, path: PathBuf, relative: String) -> Result<Node> {
        let metadata = fs::symlink_metadata(&path).map_err(|source| Error::Metadata {
            path: path.clone(),
            source,
        })?;
        build_node(&self.shared, path, relative, &metadata)
    }
}

impl DirSource for SerialDir {
    fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        while let Some((os_name, file_type)) = self.entries.pop_front() {
            let path = self.path.join(&os_name);
            let child = utf8_name(os_name, &path).and_then(|name| {
                let relative = join_relative(&self.relative, &name);
                if self.shared.excludes(&relative, file_type.is_dir()) {
                    trace!(path = %relative, "excluded");
                    return Ok(None);
                }
                let node = self.build_child(path, relative)?;
                Ok(Some(DirEntry { name, node }))
            });

            match child {
                Ok(None) => continue,
                Ok(Some(entry)) => return Ok(Some(entry)),
                Err(err) => {
                    debug!(
                        dir = %self.path.display(),
                        skipped = self.entries.len(),
                        error = %err,
                        "aborting directory enumeration"
                    );
                    self.entries.clear();
                    return Err(err);
                }
            }
        }
        Ok(None)
    }

    fn size(&self) -> Result<u64> {
        disk_usage(&self.shared, &self.path, &self.relative)
    }
}
