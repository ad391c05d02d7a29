//! fs::memory
//!
//! In-memory [`ContentFs`] for tests.
//!
//! Directories are implied by the files below them; empty directories can
//! be created explicitly. Paths registered with [`MemoryFs::fail_on`] return
//! an I/O error from every operation, which lets tests exercise error paths
//! without touching permissions on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use super::traits::{file_name, ContentFs, EntryKind, FsEntry, FsError};

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    failing: BTreeSet<String>,
}

/// In-memory filesystem.
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: Mutex<State>,
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn parents(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(i, _)| &path[..i])
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style file insertion.
    pub fn with_file(self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let path = normalize(path);
        {
            let mut state = self.lock();
            for parent in parents(&path) {
                state.dirs.insert(parent.to_string());
            }
            state.files.insert(path.clone(), contents.into());
        }
        self
    }

    /// Builder-style empty directory creation.
    pub fn with_dir(self, path: &str) -> Self {
        let path = normalize(path);
        {
            let mut state = self.lock();
            for parent in parents(&path) {
                state.dirs.insert(parent.to_string());
            }
            state.dirs.insert(path.clone());
        }
        self
    }

    /// Make every operation on `path` fail with an I/O error.
    pub fn fail_on(self, path: &str) -> Self {
        self.lock().failing.insert(normalize(path));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(state: &State, path: &str) -> Result<(), FsError> {
        if state.failing.contains(path) {
            return Err(FsError::Io {
                path: path.to_string(),
                source: std::io::Error::other("injected failure"),
            });
        }
        Ok(())
    }
}

impl ContentFs for MemoryFs {
    fn stat(&self, path: &str) -> Result<FsEntry, FsError> {
        let path = normalize(path);
        let state = self.lock();
        Self::check(&state, &path)?;

        let kind = if path.is_empty() || state.dirs.contains(&path) {
            EntryKind::Dir
        } else if state.files.contains_key(&path) {
            EntryKind::File
        } else {
            return Err(FsError::NotFound { path });
        };
        Ok(FsEntry {
            name: file_name(&path).to_string(),
            kind,
        })
    }

    fn read_dir(&self, path: &str) -> Result<Vec<FsEntry>, FsError> {
        let path = normalize(path);
        let state = self.lock();
        Self::check(&state, &path)?;
        if !path.is_empty() && !state.dirs.contains(&path) {
            return Err(FsError::NotFound { path });
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let direct_child = |p: &String| {
            p.strip_prefix(&prefix)
                .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                .map(str::to_string)
        };

        let mut entries: Vec<FsEntry> = state
            .dirs
            .iter()
            .filter_map(direct_child)
            .map(|name| FsEntry {
                name,
                kind: EntryKind::Dir,
            })
            .chain(state.files.keys().filter_map(direct_child).map(|name| FsEntry {
                name,
                kind: EntryKind::File,
            }))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let path = normalize(path);
        let state = self.lock();
        Self::check(&state, &path)?;
        state
            .files
            .get(&path)
            .cloned()
            .ok_or(FsError::NotFound { path })
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<(), FsError> {
        let path = normalize(path);
        let mut state = self.lock();
        Self::check(&state, &path)?;
        for parent in parents(&path) {
            state.dirs.insert(parent.to_string());
        }
        state.files.insert(path, contents.to_vec());
        Ok(())
    }
}
