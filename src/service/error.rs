//! service::error
//!
//! The error taxonomy exposed to callers of the facade.

use serde::Serialize;
use thiserror::Error;

use crate::core::frontmatter::FrontmatterError;
use crate::core::tree::TreeError;
use crate::core::types::TypeError;
use crate::fs::FsError;
use crate::site::SiteError;

/// Category of a failed operation.
///
/// Every failure maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unknown site, or a file that does not exist.
    NotFound,
    /// Malformed input: path, section selector, format, document shape.
    Validation,
    /// Filesystem failure.
    Io,
    /// A git operation failed.
    VersionControl,
    /// The site's lock could not be acquired in time.
    LockTimeout,
}

/// Error from a facade operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FsError> for ServiceError {
    fn from(err: FsError) -> Self {
        let kind = match err {
            FsError::NotFound { .. } => ErrorKind::NotFound,
            FsError::Symlink { .. } => ErrorKind::Validation,
            FsError::Io { .. } => ErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<TreeError> for ServiceError {
    fn from(err: TreeError) -> Self {
        let kind = if err.source.is_not_found() {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Self::new(kind, err.to_string())
    }
}

impl From<FrontmatterError> for ServiceError {
    fn from(err: FrontmatterError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<TypeError> for ServiceError {
    fn from(err: TypeError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<SiteError> for ServiceError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::Fs(e) => e.into(),
            SiteError::Document(e) => e.into(),
            SiteError::LockTimeout { .. } => Self::new(ErrorKind::LockTimeout, err.to_string()),
            SiteError::Git(_) => Self::new(ErrorKind::VersionControl, err.to_string()),
            SiteError::Lock(_) | SiteError::Workspace { .. } | SiteError::Task { .. } => {
                Self::new(ErrorKind::Io, err.to_string())
            }
        }
    }
}
