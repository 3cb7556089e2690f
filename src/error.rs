//! Error type shared by the filter, the tree constructors and `walk`

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while compiling a filter or constructing nodes.
#[derive(Debug, Error)]
pub enum Error {
    /// The ignore file could not be read.
    #[error("failed to read ignore file '{}': {source}", path.display())]
    IgnoreFile { path: PathBuf, source: io::Error },

    /// An ignore rule could not be compiled.
    #[error("invalid ignore rule: {source}")]
    IgnoreRule { source: ignore::Error },

    /// A file could not be opened for reading.
    #[error("failed to open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// A directory could not be listed.
    #[error("failed to read directory '{}': {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    /// An entry inside a directory could not be read.
    #[error("failed to read entry in '{}': {source}", path.display())]
    ReadDirEntry { path: PathBuf, source: io::Error },

    /// Metadata for a path could not be retrieved.
    #[error("failed to inspect metadata for '{}': {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },

    /// A symbolic link's target could not be read.
    #[error("failed to read link '{}': {source}", path.display())]
    ReadLink { path: PathBuf, source: io::Error },

    /// A directory entry's name is not valid UTF-8.
    #[error("entry name is not valid UTF-8: '{}'", path.display())]
    InvalidName { path: PathBuf },

    /// A symbolic link's target is not valid UTF-8.
    #[error("link target is not valid UTF-8: '{}'", path.display())]
    InvalidLinkTarget { path: PathBuf },

    /// Two in-memory entries were given the same name.
    #[error("duplicate directory entry '{name}'")]
    DuplicateEntry { name: String },

    /// The node was already closed.
    #[error("node is closed")]
    Closed,
}

impl Error {
    /// Returns the filesystem path tied to the failure, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::IgnoreFile { path, .. }
            | Error::Open { path, .. }
            | Error::ReadDir { path, .. }
            | Error::ReadDirEntry { path, .. }
            | Error::Metadata { path, .. }
            | Error::ReadLink { path, .. }
            | Error::InvalidName { path }
            | Error::InvalidLinkTarget { path } => Some(path),
            Error::IgnoreRule { .. } | Error::DuplicateEntry { .. } | Error::Closed => None,
        }
    }

    /// Whether this error came from compiling a filter rather than building nodes.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::IgnoreFile { .. } | Error::IgnoreRule { .. })
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = match &error {
            Error::IgnoreFile { source, .. }
            | Error::Open { source, .. }
            | Error::ReadDir { source, .. }
            | Error::ReadDirEntry { source, .. }
            | Error::Metadata { source, .. }
            | Error::ReadLink { source, .. } => source.kind(),
            Error::IgnoreRule { .. } | Error::DuplicateEntry { .. } => io::ErrorKind::InvalidInput,
            Error::InvalidName { .. } | Error::InvalidLinkTarget { .. } => {
                io::ErrorKind::InvalidData
            }
            Error::Closed => io::ErrorKind::Other,
        };
        io::Error::new(kind, error)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error(message: &'static str) -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, message)
    }

    #[test]
    fn test_display_names_path() {
        let err = Error::ReadDir {
            path: PathBuf::from("dir"),
            source: io_error("boom"),
        };
        assert_eq!(err.to_string(), "failed to read directory 'dir': boom");
        assert_eq!(err.path(), Some(Path::new("dir")));
    }

    #[test]
    fn test_configuration_errors() {
        let err = Error::IgnoreFile {
            path: PathBuf::from(".gitignore"),
            source: io_error("nope"),
        };
        assert!(err.is_configuration());
        assert!(!Error::Closed.is_configuration());
        assert_eq!(Error::Closed.path(), None);
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err = Error::Open {
            path: PathBuf::from("f"),
            source: io_error("denied"),
        };
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);

        let io_err: io::Error = Error::InvalidName {
            path: PathBuf::from("dir/x"),
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
