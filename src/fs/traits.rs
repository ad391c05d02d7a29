//! fs::traits
//!
//! Filesystem capability trait definition.

use thiserror::Error;

/// Errors from filesystem operations.
///
/// Every variant carries the path (relative to the filesystem root) that
/// failed, so callers can report it without extra context.
#[derive(Debug, Error)]
pub enum FsError {
    /// Nothing exists at the path.
    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    /// A component of the path is a symbolic link.
    #[error("refusing to follow symbolic link at {link} (while accessing {path})")]
    Symlink { path: String, link: String },

    /// Any other I/O failure.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl FsError {
    /// Classify an `io::Error` for `path`.
    pub fn from_io(err: std::io::Error, path: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            FsError::NotFound {
                path: path.to_string(),
            }
        } else {
            FsError::Io {
                path: path.to_string(),
                source: err,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, FsError::Symlink { .. })
    }
}

/// Kind of a directory entry. Symlinks are reported, not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

/// A single entry returned by [`ContentFs::read_dir`] or [`ContentFs::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    /// File name (last path component; empty for the root)
    pub name: String,
    pub kind: EntryKind,
}

impl FsEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Trait for working-tree filesystems.
///
/// Implementations must be thread-safe; reads may run concurrently with a
/// write performed under the site lock.
pub trait ContentFs: Send + Sync + std::fmt::Debug {
    /// Describe the entry at `path`.
    fn stat(&self, path: &str) -> Result<FsEntry, FsError>;

    /// List a directory, sorted by name.
    fn read_dir(&self, path: &str) -> Result<Vec<FsEntry>, FsError>;

    /// Read a whole file. Symbolic links are never followed.
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError>;

    /// Create or truncate a file, creating missing parent directories.
    /// Symbolic links are never followed.
    fn write(&self, path: &str, contents: &[u8]) -> Result<(), FsError>;
}

/// Last `/`-separated component of a path.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
