//! The lazily constructed tree: files, directories and symbolic links
//!
//! A [`Node`] owns whatever OS resources its variant needs and gives them up
//! on [`Node::close`] or when dropped. Nodes carry no notion of where they sit
//! in the tree; [`walk`](super::walk) tracks relative paths.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::handles::HandleGuard;
use crate::error::{Error, Result};

/// One element of the tree.
#[derive(Debug)]
pub enum Node {
    File(File),
    Directory(Directory),
    Symlink(Symlink),
}

/// The variant of a [`Node`], without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Directory(_) => NodeKind::Directory,
            Node::Symlink(_) => NodeKind::Symlink,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Release the node's OS resources. Closing twice is a no-op.
    pub fn close(&mut self) {
        match self {
            Node::File(file) => file.close(),
            Node::Directory(dir) => dir.close(),
            Node::Symlink(_) => {}
        }
    }

    /// Size in bytes: the file length, the link target length, or the total
    /// of regular files below a directory.
    pub fn size(&self) -> Result<u64> {
        match self {
            Node::File(file) => Ok(file.size()),
            Node::Directory(dir) => dir.size(),
            Node::Symlink(link) => Ok(link.size()),
        }
    }

    /// Absolute path on disk, for filesystem-backed files and directories.
    pub fn abs_path(&self) -> Option<&Path> {
        match self {
            Node::File(file) => file.abs_path(),
            Node::Directory(dir) => dir.abs_path(),
            Node::Symlink(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn as_symlink(&self) -> Option<&Symlink> {
        match self {
            Node::Symlink(link) => Some(link),
            _ => None,
        }
    }

    /// Move an open file out of this node so it outlives the current visit.
    ///
    /// The node left behind is a closed file of the same size.
    pub fn take_file(&mut self) -> Option<File> {
        self.as_file_mut().map(File::take)
    }
}

/// A sequential byte stream with a best-effort size.
pub struct File {
    reader: Option<Box<dyn Read + Send>>,
    size: u64,
    abs_path: Option<PathBuf>,
    handle: Option<HandleGuard>,
}

impl File {
    pub(crate) fn new(
        reader: Box<dyn Read + Send>,
        size: u64,
        abs_path: Option<PathBuf>,
        handle: Option<HandleGuard>,
    ) -> Self {
        Self {
            reader: Some(reader),
            size,
            abs_path,
            handle,
        }
    }

    /// Size reported when the file was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn abs_path(&self) -> Option<&Path> {
        self.abs_path.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    pub fn close(&mut self) {
        self.reader = None;
        self.handle = None;
    }

    fn take(&mut self) -> File {
        File {
            reader: self.reader.take(),
            size: self.size,
            abs_path: self.abs_path.clone(),
            handle: self.handle.take(),
        }
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Err(Error::Closed.into()),
        }
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("size", &self.size)
            .field("abs_path", &self.abs_path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// One child yielded by a [`Directory`].
#[derive(Debug)]
pub struct DirEntry {
    pub name: String,
    pub node: Node,
}

/// Where a directory's children come from.
pub(crate) trait DirSource: Send {
    /// The next child, or `None` once every entry has been produced.
    fn next_entry(&mut self) -> Result<Option<DirEntry>>;

    /// Total bytes of regular files not yet yielded.
    fn size(&self) -> Result<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Open,
    Done,
    Closed,
}

/// A cursor over child nodes, produced one at a time in name order.
pub struct Directory {
    source: Option<Box<dyn DirSource>>,
    abs_path: Option<PathBuf>,
    cursor: Cursor,
}

impl Directory {
    pub(crate) fn new(source: Box<dyn DirSource>, abs_path: Option<PathBuf>) -> Self {
        Self {
            source: Some(source),
            abs_path,
            cursor: Cursor::Open,
        }
    }

    /// Produce the next child, or `None` at the end of the entries.
    ///
    /// An error ends the enumeration: later calls return `None`. A closed
    /// directory has no more entries.
    pub fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        if self.cursor != Cursor::Open {
            return Ok(None);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        match source.next_entry() {
            Ok(Some(entry)) => Ok(Some(entry)),
            Ok(None) => {
                self.cursor = Cursor::Done;
                Ok(None)
            }
            Err(err) => {
                self.cursor = Cursor::Done;
                Err(err)
            }
        }
    }

    /// Iterate the remaining entries.
    pub fn entries(&mut self) -> Entries<'_> {
        Entries { dir: self }
    }

    /// Total bytes of regular files below this directory that have not been
    /// yielded yet; for filesystem directories this is everything below it.
    pub fn size(&self) -> Result<u64> {
        match (&self.source, self.cursor) {
            (_, Cursor::Closed) | (None, _) => Err(Error::Closed),
            (Some(source), _) => source.size(),
        }
    }

    pub fn abs_path(&self) -> Option<&Path> {
        self.abs_path.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.cursor == Cursor::Closed
    }

    pub fn close(&mut self) {
        self.cursor = Cursor::Closed;
        self.source = None;
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("abs_path", &self.abs_path)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Iterator adapter over [`Directory::next_entry`].
pub struct Entries<'a> {
    dir: &'a mut Directory,
}

impl Iterator for Entries<'_> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.dir.next_entry().transpose()
    }
}

/// A link that is recorded but never followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symlink {
    target: String,
}

impl Symlink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn size(&self) -> u64 {
        self.target.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    fn bytes_file(data: &'static [u8]) -> File {
        File::new(Box::new(IoCursor::new(data)), data.len() as u64, None, None)
    }

    #[test]
    fn test_file_read_then_close() {
        let mut file = bytes_file(b"beep");
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        assert_eq!(out, "beep");

        file.close();
        file.close();
        assert!(file.is_closed());
        let err = file.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.to_string(), "node is closed");
        assert_eq!(file.size(), 4);
    }

    #[test]
    fn test_take_file_leaves_closed_node() {
        let mut node = Node::File(bytes_file(b"boop"));
        let mut taken = node.take_file().unwrap();
        assert!(node.as_file_mut().unwrap().is_closed());

        let mut out = Vec::new();
        taken.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"boop");
    }

    #[test]
    fn test_symlink_size_is_target_length() {
        let node = Node::Symlink(Symlink::new("../target"));
        assert_eq!(node.kind(), NodeKind::Symlink);
        assert_eq!(node.size().unwrap(), 9);
        assert_eq!(node.as_symlink().unwrap().target(), "../target");
        assert!(node.abs_path().is_none());
    }

    struct Failing {
        calls: usize,
    }

    impl DirSource for Failing {
        fn next_entry(&mut self) -> Result<Option<DirEntry>> {
            self.calls += 1;
            if self.calls == 1 {
                Ok(Some(DirEntry {
                    name: "a".to_string(),
                    node: Node::Symlink(Symlink::new("x")),
                }))
            } else {
                Err(Error::Closed)
            }
        }

        fn size(&self) -> Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn test_directory_stops_after_error() {
        let mut dir = Directory::new(Box::new(Failing { calls: 0 }), None);
        assert_eq!(dir.next_entry().unwrap().unwrap().name, "a");
        assert!(dir.next_entry().is_err());
        assert!(dir.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_closed_directory_has_no_entries() {
        let mut dir = Directory::new(Box::new(Failing { calls: 0 }), None);
        dir.close();
        dir.close();
        assert!(dir.is_closed());
        assert!(dir.next_entry().unwrap().is_none());
        assert!(matches!(dir.size(), Err(Error::Closed)));
        assert_eq!(dir.entries().count(), 0);
    }
}
