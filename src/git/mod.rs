//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. No other module imports
//! `git2`, and nothing shells out to the git CLI.
//!
//! # Responsibilities
//!
//! - Cloning a site's remote and opening its working copy
//! - Working tree status
//! - Fetch + fast-forward of the checked-out branch
//! - Staging a single path and committing it
//! - Replacing the release tag and pushing branch and tag
//!
//! # Invariants
//!
//! - Pull never merges: it fast-forwards or fails
//! - Network operations are bounded by [`RemoteOptions::timeout`], and a
//!   silent remote by the socket timeouts of [`set_network_timeouts`]
//! - All operations return strong types (Oid, BranchName, TagName)
//!
//! # Example
//!
//! ```ignore
//! use mycro::core::config::Identity;
//! use mycro::git::{Git, RemoteAuth, RemoteOptions};
//! use std::time::Duration;
//!
//! let remote = RemoteOptions::new(RemoteAuth::default(), Duration::from_secs(60));
//! let git = Git::clone("git@example.com:org/blog.git", path, &remote, None)?;
//!
//! std::fs::write(path.join("posts/a.md"), "---\n---\nhi\n")?;
//! let record = git.commit_path("posts/a.md", &Identity::default(), "content change for posts/a.md")?;
//! git.push_branch(&remote)?;
//! ```

mod interface;

pub use interface::{
    ChangeKind, CommitRecord, Git, GitError, PullOutcome, PushOutcome, RemoteAuth, RemoteOptions,
    StatusEntry, StatusReport, REMOTE, set_network_timeouts,
};
