//! git::interface
//!
//! The Git interface implementation.
//!
//! All git2 calls are blocking. Callers on an async runtime run them on a
//! blocking thread (see `site::SiteRepo`).

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Utc};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{CredentialType, FetchOptions, PushOptions, RemoteCallbacks};
use serde::Serialize;
use thiserror::Error;

use crate::core::config::Identity;
use crate::core::types::{BranchName, Oid, TagName, TypeError};

/// Name of the only remote mycro works with.
pub const REMOTE: &str = "origin";

/// Credential attempts before giving up (libgit2 retries indefinitely).
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// HEAD does not point at a branch.
    #[error("HEAD is detached or unborn, no branch to work on")]
    NoBranch,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Local and remote history diverged.
    #[error("cannot fast-forward {branch}: local and remote history diverged")]
    NotFastForward {
        /// The branch being updated
        branch: String,
    },

    /// Checkout would overwrite local modifications.
    #[error("checkout conflict: {message}")]
    CheckoutConflict {
        /// libgit2's description of the conflict
        message: String,
    },

    /// The remote refused a pushed ref.
    #[error("remote rejected {refname}: {reason}")]
    PushRejected {
        /// The remote ref that was rejected
        refname: String,
        /// Reason given by the remote
        reason: String,
    },

    /// A clone, fetch, or push ran past its deadline.
    #[error("{operation} timed out after {}s", .after.as_secs())]
    TimedOut {
        /// clone, fetch or push
        operation: &'static str,
        /// The configured remote timeout
        after: Duration,
    },

    /// Authentication with the remote failed.
    #[error("authentication failed for {url}: {message}")]
    AuthFailed {
        /// Remote URL
        url: String,
        /// Description of the failure
        message: String,
    },

    /// Invalid object id or ref name.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match (err.code(), err.class()) {
            (git2::ErrorCode::NotFound, git2::ErrorClass::Reference) => GitError::RefNotFound {
                refname: context.to_string(),
            },
            (git2::ErrorCode::Conflict, _) | (_, git2::ErrorClass::Checkout) => {
                GitError::CheckoutConflict {
                    message: err.message().to_string(),
                }
            }
            (git2::ErrorCode::Auth, _) => GitError::AuthFailed {
                url: context.to_string(),
                message: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

fn to_oid(oid: git2::Oid) -> Result<Oid, GitError> {
    Ok(Oid::new(oid.to_string())?)
}

// =============================================================================
// Remote access
// =============================================================================

/// Credentials and deadline for network operations.
#[derive(Clone, Default)]
pub struct RemoteAuth {
    /// SSH private key; falls back to the SSH agent when absent
    pub key: Option<PathBuf>,
    /// Passphrase for `key`
    pub passphrase: Option<String>,
}

impl std::fmt::Debug for RemoteAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAuth")
            .field("key", &self.key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything a clone, fetch or push needs besides the repository.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    pub auth: RemoteAuth,
    /// Maximum duration of one network operation
    pub timeout: Duration,
}

impl RemoteOptions {
    pub fn new(auth: RemoteAuth, timeout: Duration) -> Self {
        Self { auth, timeout }
    }
}

/// Bound every socket libgit2 opens: a connect, and each read or write,
/// gives up after `timeout`.
///
/// The transfer deadline is only checked from callbacks, which a remote
/// that accepts the connection and then stays silent never triggers. With
/// this set, such a remote fails after `timeout` and the operation is
/// reported as [`GitError::TimedOut`].
///
/// The setting is process-wide. Call it once at startup, before any
/// network operation runs.
pub fn set_network_timeouts(timeout: Duration) -> Result<(), GitError> {
    let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
    // SAFETY: both calls store an integer in libgit2's global options; callers
    // invoke this at startup while no transfer is reading them.
    unsafe {
        git2::opts::set_server_connect_timeout_in_milliseconds(millis)?;
        git2::opts::set_server_timeout_in_milliseconds(millis)?;
    }
    Ok(())
}

/// Per-operation state shared by the git2 callbacks.
///
/// libgit2 has no overall transfer timeout. The progress callbacks check
/// the deadline and abort the transfer once it has passed; `expired`
/// records that the abort was ours so the error can be reported as
/// [`GitError::TimedOut`]. A failure after the deadline is reported the
/// same way, which covers socket timeouts (see [`set_network_timeouts`]).
///
/// For pushes, `updated` records whether negotiation found any remote ref
/// that actually moves.
struct Transfer<'a> {
    options: &'a RemoteOptions,
    operation: &'static str,
    deadline: Instant,
    expired: Cell<bool>,
    updated: Cell<bool>,
    rejected: RefCell<Option<(String, String)>>,
}

impl<'a> Transfer<'a> {
    fn new(options: &'a RemoteOptions, operation: &'static str) -> Self {
        Self {
            options,
            operation,
            deadline: Instant::now() + options.timeout,
            expired: Cell::new(false),
            updated: Cell::new(false),
            rejected: RefCell::new(None),
        }
    }

    /// Returns false (abort) once the deadline has passed.
    fn on_time(&self) -> bool {
        if Instant::now() >= self.deadline {
            self.expired.set(true);
            return false;
        }
        true
    }

    fn callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let auth = &self.options.auth;
        let mut attempts = 0;

        callbacks.credentials(move |_url, username, allowed| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("credentials rejected by remote"));
            }
            if !self.on_time() {
                return Err(git2::Error::from_str("deadline exceeded"));
            }
            let user = username.unwrap_or("git");
            if allowed.contains(CredentialType::USERNAME) {
                return git2::Cred::username(user);
            }
            if allowed.contains(CredentialType::SSH_KEY) {
                return match &auth.key {
                    Some(key) => git2::Cred::ssh_key(user, None, key, auth.passphrase.as_deref()),
                    None => git2::Cred::ssh_key_from_agent(user),
                };
            }
            if allowed.contains(CredentialType::DEFAULT) {
                return git2::Cred::default();
            }
            Err(git2::Error::from_str("remote requires an unsupported credential type"))
        });
        callbacks.transfer_progress(move |_| self.on_time());
        callbacks.sideband_progress(move |_| self.on_time());
        callbacks.push_negotiation(move |updates| {
            if !self.on_time() {
                return Err(git2::Error::from_str("deadline exceeded"));
            }
            if updates.iter().any(|u| u.src() != u.dst()) {
                self.updated.set(true);
            }
            Ok(())
        });
        callbacks.push_update_reference(move |refname, status| {
            if let Some(reason) = status {
                *self.rejected.borrow_mut() = Some((refname.to_string(), reason.to_string()));
            }
            Ok(())
        });
        callbacks
    }

    /// Map a failed transfer to a timeout when our deadline caused it.
    fn error(&self, err: git2::Error, context: &str) -> GitError {
        if self.expired.get() || Instant::now() >= self.deadline {
            GitError::TimedOut {
                operation: self.operation,
                after: self.options.timeout,
            }
        } else {
            GitError::from_git2(err, context)
        }
    }

    fn fetch_options(&self) -> FetchOptions<'_> {
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(self.callbacks());
        fetch
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Result of a pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PullOutcome {
    /// The remote had nothing new.
    UpToDate,
    /// The branch was fast-forwarded.
    FastForwarded { from: Option<Oid>, to: Oid },
}

/// Result of pushing one ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushOutcome {
    UpToDate,
    Pushed,
}

/// A commit created by mycro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub revision: Oid,
    pub name: String,
    pub email: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
}

/// How one side (index or working tree) of a path changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unmodified,
    Added,
    Modified,
    Deleted,
    Renamed,
    Typechange,
    Untracked,
    Conflicted,
}

/// Status of one changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub path: String,
    pub staging: ChangeKind,
    pub worktree: ChangeKind,
}

/// Local repository status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Checked-out branch (None when detached)
    pub branch: Option<String>,
    /// HEAD commit (None when unborn)
    pub head: Option<Oid>,
    /// No staged, unstaged or untracked changes
    pub clean: bool,
    pub staged: usize,
    pub unstaged: usize,
    pub untracked: usize,
    pub has_conflicts: bool,
    pub entries: Vec<StatusEntry>,
}

fn staging_kind(status: git2::Status) -> ChangeKind {
    if status.is_conflicted() {
        ChangeKind::Conflicted
    } else if status.is_index_new() {
        ChangeKind::Added
    } else if status.is_index_modified() {
        ChangeKind::Modified
    } else if status.is_index_deleted() {
        ChangeKind::Deleted
    } else if status.is_index_renamed() {
        ChangeKind::Renamed
    } else if status.is_index_typechange() {
        ChangeKind::Typechange
    } else {
        ChangeKind::Unmodified
    }
}

fn worktree_kind(status: git2::Status) -> ChangeKind {
    if status.is_conflicted() {
        ChangeKind::Conflicted
    } else if status.is_wt_new() {
        ChangeKind::Untracked
    } else if status.is_wt_modified() {
        ChangeKind::Modified
    } else if status.is_wt_deleted() {
        ChangeKind::Deleted
    } else if status.is_wt_renamed() {
        ChangeKind::Renamed
    } else if status.is_wt_typechange() {
        ChangeKind::Typechange
    } else {
        ChangeKind::Unmodified
    }
}

fn timestamp(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| Utc::now().fixed_offset().timezone());
    DateTime::from_timestamp(time.seconds(), 0)
        .map(|dt| dt.with_timezone(&offset))
        .unwrap_or_else(|| Utc::now().fixed_offset())
}

// =============================================================================
// Git
// =============================================================================

/// A site's working copy.
///
/// Wraps a `git2::Repository`, which is `Send` but not `Sync`: one `Git`
/// is owned by one site and used from one thread at a time.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Opening and cloning
    // =========================================================================

    /// Clone `url` into `path`.
    ///
    /// Checks out `branch`, or the remote's default branch when `None`.
    ///
    /// # Errors
    ///
    /// - [`GitError::TimedOut`] if the transfer exceeds the remote timeout
    /// - [`GitError::AuthFailed`] if the remote rejects the credentials
    pub fn clone(
        url: &str,
        path: &Path,
        remote: &RemoteOptions,
        branch: Option<&BranchName>,
    ) -> Result<Self, GitError> {
        let transfer = Transfer::new(remote, "clone");
        let mut builder = RepoBuilder::new();
        builder.fetch_options(transfer.fetch_options());
        if let Some(branch) = branch {
            builder.branch(branch.as_str());
        }

        let repo = builder
            .clone(url, path)
            .map_err(|e| transfer.error(e, url))?;
        Ok(Self { repo })
    }

    /// Open an existing working copy at exactly `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }
        Ok(Self { repo })
    }

    /// The working directory.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    // =========================================================================
    // Refs
    // =========================================================================

    /// Get HEAD commit OID.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (empty repository)
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|_| GitError::RefNotFound {
                refname: "HEAD".to_string(),
            })?;
        to_oid(commit.id())
    }

    fn try_head_oid(&self) -> Result<Option<Oid>, GitError> {
        match self.head_oid() {
            Ok(oid) => Ok(Some(oid)),
            Err(GitError::RefNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(Some(BranchName::new(name)?));
            }
        }

        Ok(None)
    }

    fn branch(&self) -> Result<BranchName, GitError> {
        self.current_branch()?.ok_or(GitError::NoBranch)
    }

    /// Resolve a ref to the commit it points at, `None` if it doesn't exist.
    pub fn try_resolve_ref(&self, refname: &str) -> Result<Option<Oid>, GitError> {
        let reference = match self.repo.find_reference(refname) {
            Ok(r) => r,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, refname)),
        };
        let commit = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname))?;
        Ok(Some(to_oid(commit.id())?))
    }

    /// Remote-tracking ref of `branch` on [`REMOTE`].
    fn tracking_ref(branch: &BranchName) -> String {
        format!("refs/remotes/{REMOTE}/{}", branch.as_str())
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Local working tree status, including untracked files.
    pub fn status_report(&self) -> Result<StatusReport, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut report = StatusReport {
            branch: self.current_branch()?.map(|b| b.as_str().to_string()),
            head: self.try_head_oid()?,
            ..Default::default()
        };

        for entry in statuses.iter() {
            let status = entry.status();
            let staging = staging_kind(status);
            let worktree = worktree_kind(status);

            if status.is_conflicted() {
                report.has_conflicts = true;
            }
            if !matches!(staging, ChangeKind::Unmodified | ChangeKind::Conflicted) {
                report.staged += 1;
            }
            match worktree {
                ChangeKind::Untracked => report.untracked += 1,
                ChangeKind::Unmodified | ChangeKind::Conflicted => {}
                _ => report.unstaged += 1,
            }

            report.entries.push(StatusEntry {
                path: String::from_utf8_lossy(entry.path_bytes()).into_owned(),
                staging,
                worktree,
            });
        }

        report.clean = report.entries.is_empty();
        Ok(report)
    }

    // =========================================================================
    // Pull
    // =========================================================================

    /// Fetch the current branch from [`REMOTE`] and fast-forward to it.
    ///
    /// The working tree is checked out safely before the branch ref moves,
    /// so local modifications to files the update touches abort the pull
    /// with [`GitError::CheckoutConflict`] and leave HEAD where it was.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotFastForward`] if local and remote diverged
    /// - [`GitError::TimedOut`] if the fetch exceeds the remote timeout
    pub fn pull(&self, remote: &RemoteOptions) -> Result<PullOutcome, GitError> {
        let branch = self.branch()?;
        let tracking = Self::tracking_ref(&branch);
        let refspec = format!("+{}:{}", branch.refname(), tracking);

        let transfer = Transfer::new(remote, "fetch");
        let mut origin = self
            .repo
            .find_remote(REMOTE)
            .map_err(|e| GitError::from_git2(e, REMOTE))?;
        origin
            .fetch(&[refspec.as_str()], Some(&mut transfer.fetch_options()), None)
            .map_err(|e| transfer.error(e, REMOTE))?;

        let fetched = self
            .repo
            .find_reference(&tracking)
            .map_err(|e| GitError::from_git2(e, &tracking))?;
        let incoming = self.repo.reference_to_annotated_commit(&fetched)?;
        let (analysis, _) = self.repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            return Ok(PullOutcome::UpToDate);
        }
        if !(analysis.is_fast_forward() || analysis.is_unborn()) {
            return Err(GitError::NotFastForward {
                branch: branch.as_str().to_string(),
            });
        }

        let from = self.try_head_oid()?;
        let target = self.repo.find_commit(incoming.id())?;
        self.repo
            .checkout_tree(target.as_object(), Some(CheckoutBuilder::new().safe()))
            .map_err(|e| GitError::from_git2(e, "checkout"))?;

        let message = format!("mycro: fast-forward to {}", incoming.id());
        self.repo
            .reference(&branch.refname(), incoming.id(), true, &message)
            .map_err(|e| GitError::from_git2(e, &branch.refname()))?;
        self.repo
            .set_head(&branch.refname())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        Ok(PullOutcome::FastForwarded {
            from,
            to: to_oid(incoming.id())?,
        })
    }

    // =========================================================================
    // Commit and tag
    // =========================================================================

    /// Stage `path` (relative to the working directory) and commit it.
    ///
    /// Only this path is staged. Other modifications in the tree stay as
    /// they are.
    pub fn commit_path(
        &self,
        path: &str,
        identity: &Identity,
        message: &str,
    ) -> Result<CommitRecord, GitError> {
        let mut index = self.repo.index()?;
        index
            .add_path(Path::new(path))
            .map_err(|e| GitError::from_git2(e, path))?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = git2::Signature::now(&identity.name, &identity.email)?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| GitError::from_git2(e, "commit"))?;

        Ok(CommitRecord {
            revision: to_oid(oid)?,
            name: identity.name.clone(),
            email: identity.email.clone(),
            timestamp: timestamp(signature.when()),
            message: message.to_string(),
        })
    }

    /// Move the annotated tag `tag` to HEAD.
    ///
    /// Any existing local tag of that name is deleted first. The tag
    /// message is the tag name.
    pub fn replace_tag(&self, tag: &TagName, identity: &Identity) -> Result<Oid, GitError> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel(git2::ObjectType::Commit))
            .map_err(|_| GitError::RefNotFound {
                refname: "HEAD".to_string(),
            })?;

        match self.repo.tag_delete(tag.as_str()) {
            Ok(()) => {}
            Err(e) if e.code() == git2::ErrorCode::NotFound => {}
            Err(e) => return Err(GitError::from_git2(e, &tag.refname())),
        }

        let tagger = git2::Signature::now(&identity.name, &identity.email)?;
        self.repo
            .tag(tag.as_str(), &head, &tagger, tag.as_str(), false)
            .map_err(|e| GitError::from_git2(e, &tag.refname()))?;
        to_oid(head.id())
    }

    // =========================================================================
    // Push
    // =========================================================================

    /// Push one refspec. Returns whether any remote ref moved.
    fn push(&self, refspec: &str, remote: &RemoteOptions) -> Result<bool, GitError> {
        let transfer = Transfer::new(remote, "push");
        let mut origin = self
            .repo
            .find_remote(REMOTE)
            .map_err(|e| GitError::from_git2(e, REMOTE))?;

        let mut options = PushOptions::new();
        options.remote_callbacks(transfer.callbacks());
        origin
            .push(&[refspec], Some(&mut options))
            .map_err(|e| transfer.error(e, REMOTE))?;

        if let Some((refname, reason)) = transfer.rejected.take() {
            return Err(GitError::PushRejected { refname, reason });
        }
        Ok(transfer.updated.get())
    }

    /// Push the current branch to [`REMOTE`].
    ///
    /// The remote is always contacted: the local remote-tracking ref may be
    /// stale. The outcome is [`PushOutcome::UpToDate`] when the remote
    /// branch already pointed at HEAD.
    pub fn push_branch(&self, remote: &RemoteOptions) -> Result<PushOutcome, GitError> {
        let branch = self.branch()?;
        let head = self.head_oid()?;
        let tracking = Self::tracking_ref(&branch);

        let refname = branch.refname();
        let moved = self.push(&format!("{refname}:{refname}"), remote)?;

        let target = git2::Oid::from_str(head.as_str())?;
        self.repo
            .reference(&tracking, target, true, "mycro: push")
            .map_err(|e| GitError::from_git2(e, &tracking))?;
        Ok(if moved {
            PushOutcome::Pushed
        } else {
            PushOutcome::UpToDate
        })
    }

    /// Force-push `tag` to [`REMOTE`], replacing the remote tag.
    pub fn push_tag(&self, tag: &TagName, remote: &RemoteOptions) -> Result<(), GitError> {
        let refname = tag.refname();
        self.push(&format!("+{refname}:{refname}"), remote)?;
        Ok(())
    }
}
