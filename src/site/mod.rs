//! site
//!
//! Site repository bindings.
//!
//! # Architecture
//!
//! A [`SiteRepo`] owns one working copy: the [`Git`] handle for it and a
//! [`ContentFs`] rooted at its working directory. Neither is shared with
//! another site. The [`SiteRegistry`] builds every binding once at startup
//! and is read-only afterwards.
//!
//! # Concurrency
//!
//! The `Git` handle sits behind a per-site `tokio::sync::Mutex`. Every
//! operation that touches the repository (status, pull, write, publish)
//! waits for it at most `lock_timeout`, then runs its git2 work on a
//! blocking thread that owns the guard. The guard is released when that
//! work finishes, even if the request that started it has gone away.
//!
//! Reads of raw files and tree listings use [`SiteRepo::fs`] directly and
//! do not take the lock.
//!
//! # Example
//!
//! ```ignore
//! let site = registry.get("blog").expect("configured");
//! let record = site.write_file("content/a.md".into(), Section::All, b"---\n---\nhi\n".to_vec()).await?;
//! let report = site.publish().await?;
//! ```

mod registry;

pub use registry::SiteRegistry;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::config::{Identity, SiteConfig};
use crate::core::frontmatter::{self, FrontmatterError};
use crate::core::lock::{LockError, WorkspaceLock};
use crate::core::types::{Oid, Section, TagName};
use crate::fs::{ContentFs, FsError};
use crate::git::{
    CommitRecord, Git, GitError, PullOutcome, PushOutcome, RemoteOptions, StatusReport,
};

/// Errors from site operations.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The site's lock could not be taken in time.
    #[error("site '{site}' is busy, gave up after waiting {}s", .after.as_secs_f32())]
    LockTimeout { site: String, after: Duration },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Document(#[from] FrontmatterError),

    #[error(transparent)]
    Lock(#[from] LockError),

    /// Preparing the checkout directory failed.
    #[error("failed to prepare {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The blocking task running the operation panicked or was cancelled.
    #[error("site '{site}': {operation} did not complete: {message}")]
    Task {
        site: String,
        operation: &'static str,
        message: String,
    },
}

/// Settings shared by every operation of one site.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Credentials and timeout for clone, fetch and push
    pub remote: RemoteOptions,
    /// Author of commits and tagger of release tags
    pub committer: Identity,
    /// Maximum wait for the site's lock
    pub lock_timeout: Duration,
}

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// HEAD at publish time
    pub revision: Oid,
    /// Branch push result
    pub branch: PushOutcome,
    /// Release tag moved to `revision`, if one is configured
    pub tag: Option<TagName>,
}

/// One managed site: configuration, working copy and its lock.
#[derive(Debug)]
pub struct SiteRepo {
    name: String,
    config: SiteConfig,
    settings: SiteSettings,
    work_dir: PathBuf,
    fs: Arc<dyn ContentFs>,
    git: Arc<Mutex<Git>>,
    _lock: Option<WorkspaceLock>,
}

impl SiteRepo {
    /// Bind an already opened working copy.
    ///
    /// `fs` must be rooted at the working directory of `git`.
    pub fn new(
        name: impl Into<String>,
        config: SiteConfig,
        settings: SiteSettings,
        git: Git,
        fs: Arc<dyn ContentFs>,
    ) -> Result<Self, SiteError> {
        let work_dir = git.work_dir()?.to_path_buf();
        Ok(Self {
            name: name.into(),
            config,
            settings,
            work_dir,
            fs,
            git: Arc::new(Mutex::new(git)),
            _lock: None,
        })
    }

    /// Keep `lock` for as long as this binding lives.
    pub(crate) fn holding(mut self, lock: WorkspaceLock) -> Self {
        self._lock = Some(lock);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Filesystem rooted at the working directory (lock-free reads).
    pub fn fs(&self) -> &dyn ContentFs {
        self.fs.as_ref()
    }

    /// Run `op` on the repository under the site lock.
    async fn locked<T, F>(&self, operation: &'static str, op: F) -> Result<T, SiteError>
    where
        T: Send + 'static,
        F: FnOnce(&Git) -> Result<T, SiteError> + Send + 'static,
    {
        let after = self.settings.lock_timeout;
        let guard = tokio::time::timeout(after, Arc::clone(&self.git).lock_owned())
            .await
            .map_err(|_| {
                tracing::warn!(site = %self.name, operation, "lock wait timed out");
                SiteError::LockTimeout {
                    site: self.name.clone(),
                    after,
                }
            })?;

        tokio::task::spawn_blocking(move || op(&guard))
            .await
            .map_err(|e| SiteError::Task {
                site: self.name.clone(),
                operation,
                message: e.to_string(),
            })?
    }

    /// Local status. Never touches the network.
    pub async fn status(&self) -> Result<StatusReport, SiteError> {
        self.locked("status", |git| Ok(git.status_report()?)).await
    }

    /// Fetch and fast-forward the checked-out branch.
    pub async fn pull(&self) -> Result<PullOutcome, SiteError> {
        let remote = self.settings.remote.clone();
        let outcome = self
            .locked("pull", move |git| Ok(git.pull(&remote)?))
            .await?;

        match &outcome {
            PullOutcome::UpToDate => tracing::debug!(site = %self.name, "already up to date"),
            PullOutcome::FastForwarded { to, .. } => {
                tracing::info!(site = %self.name, revision = %to, "fast-forwarded")
            }
        }
        Ok(outcome)
    }

    /// Write `contents` to `path` (relative to the working directory) and
    /// commit that single path.
    ///
    /// For a partial `section` the existing file is read and the section
    /// replaced while the lock is held, so concurrent edits of the two
    /// sections of one document both survive. A failed commit leaves the
    /// written file in place; `status` shows it.
    pub async fn write_file(
        &self,
        path: String,
        section: Section,
        contents: Vec<u8>,
    ) -> Result<CommitRecord, SiteError> {
        let fs = Arc::clone(&self.fs);
        let committer = self.settings.committer.clone();
        let commit_path = path.clone();

        let record = self
            .locked("write", move |git| {
                let contents = if section.is_partial() {
                    let existing = fs.read(&commit_path)?;
                    frontmatter::join(&existing, &contents, section)?
                } else {
                    contents
                };
                fs.write(&commit_path, &contents)?;
                let message = format!("content change for {commit_path}");
                Ok(git.commit_path(&commit_path, &committer, &message)?)
            })
            .await?;

        tracing::info!(
            site = %self.name,
            path = %path,
            section = %section,
            revision = %record.revision,
            "committed"
        );
        Ok(record)
    }

    /// Move the release tag (if configured) to HEAD, push the branch, then
    /// force-push the tag.
    pub async fn publish(&self) -> Result<PublishReport, SiteError> {
        let remote = self.settings.remote.clone();
        let committer = self.settings.committer.clone();
        let tag = self.config.tag.clone();

        let report = self
            .locked("publish", move |git| {
                let revision = git.head_oid()?;
                if let Some(tag) = &tag {
                    git.replace_tag(tag, &committer)?;
                }
                let branch = git.push_branch(&remote)?;
                if let Some(tag) = &tag {
                    git.push_tag(tag, &remote)?;
                }
                Ok(PublishReport {
                    revision,
                    branch,
                    tag,
                })
            })
            .await?;

        tracing::info!(
            site = %self.name,
            revision = %report.revision,
            tag = report.tag.as_ref().map(TagName::as_str).unwrap_or("-"),
            "published"
        );
        Ok(report)
    }
}
