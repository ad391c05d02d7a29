//! fs::disk
//!
//! [`ContentFs`] backed by `std::fs`, rooted at a directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::traits::{file_name, ContentFs, EntryKind, FsEntry, FsError};

/// A filesystem rooted at a site's working directory.
#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|c| !c.is_empty())
            .fold(self.root.clone(), |acc, c| acc.join(c))
    }

    /// Resolve `path`, refusing any component below the root that is a
    /// symlink. Walking stops at the first component that does not exist.
    fn resolve_confined(&self, path: &str) -> Result<PathBuf, FsError> {
        let mut resolved = self.root.clone();
        let mut checking = true;
        let mut walked = Vec::new();

        for component in path.split('/').filter(|c| !c.is_empty()) {
            resolved.push(component);
            walked.push(component);
            if !checking {
                continue;
            }
            match fs::symlink_metadata(&resolved) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    return Err(FsError::Symlink {
                        path: path.to_string(),
                        link: walked.join("/"),
                    });
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => checking = false,
                Err(e) => return Err(FsError::from_io(e, path)),
            }
        }
        Ok(resolved)
    }
}

fn kind_of(file_type: fs::FileType) -> EntryKind {
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Dir
    } else {
        EntryKind::File
    }
}

impl ContentFs for DiskFs {
    fn stat(&self, path: &str) -> Result<FsEntry, FsError> {
        let meta = fs::symlink_metadata(self.resolve(path)).map_err(|e| FsError::from_io(e, path))?;
        Ok(FsEntry {
            name: file_name(path).to_string(),
            kind: kind_of(meta.file_type()),
        })
    }

    fn read_dir(&self, path: &str) -> Result<Vec<FsEntry>, FsError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(path)).map_err(|e| FsError::from_io(e, path))? {
            let entry = entry.map_err(|e| FsError::from_io(e, path))?;
            let file_type = entry.file_type().map_err(|e| FsError::from_io(e, path))?;
            entries.push(FsEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind: kind_of(file_type),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        fs::read(self.resolve_confined(path)?).map_err(|e| FsError::from_io(e, path))
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<(), FsError> {
        let target = self.resolve_confined(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::from_io(e, path))?;
        }
        fs::write(&target, contents).map_err(|e| FsError::Io {
            path: path.to_string(),
            source: e,
        })
    }
}
