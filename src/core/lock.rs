//! core::lock
//!
//! Exclusive lock on a site's working copy.
//!
//! The in-process per-site mutex serializes requests inside one server.
//! This lock keeps a second mycro process (or a second server pointed at
//! the same workspace) from cloning over or committing into a working copy
//! that is already managed.
//!
//! # Storage
//!
//! - `<workspace>/<site>.lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - The lock is taken before the site directory is touched and held for
//!   the lifetime of the site binding
//! - Acquisition is non-blocking (fails fast if locked)
//! - The lock is released on drop

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("site '{site}' is in use by another mycro process ({path})")]
    AlreadyLocked { site: String, path: PathBuf },

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on one site inside the workspace.
#[derive(Debug)]
pub struct WorkspaceLock {
    path: PathBuf,
    file: Option<File>,
}

impl WorkspaceLock {
    /// Lock file location for `site` in `workspace`.
    pub fn path_for(workspace: &Path, site: &str) -> PathBuf {
        workspace.join(format!("{site}.lock"))
    }

    /// Attempt to acquire the lock for `site`.
    ///
    /// Creates the workspace directory if needed.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(workspace: &Path, site: &str) -> Result<Self, LockError> {
        fs::create_dir_all(workspace).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", workspace.display(), e))
        })?;

        let path = Self::path_for(workspace, site);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked {
                    site: site.to_string(),
                    path,
                })
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
