//! Shared fixtures for integration tests.
//!
//! A [`Remote`] is a bare repository plus a seed clone used to push
//! changes "from somewhere else". Sites are cloned from the bare
//! repository into a temporary workspace, exactly as at startup.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use mycro::core::config::{Identity, SiteConfig};
use mycro::core::types::TagName;
use mycro::git::{RemoteAuth, RemoteOptions};
use mycro::service::SiteService;
use mycro::site::{SiteRegistry, SiteRepo, SiteSettings};

pub const HELLO: &str = "---\ntitle: Hello\n---\nHello world\n";

/// Run a git command in `dir`, panicking with its stderr on failure.
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// A bare remote with one commit on `main`.
pub struct Remote {
    dir: TempDir,
}

impl Remote {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let remote = Self { dir };

        run_git(remote.dir.path(), &["init", "-q", "--bare", "remote.git"]);
        run_git(remote.dir.path(), &["init", "-q", "seed"]);
        let seed = remote.seed();
        run_git(&seed, &["config", "user.email", "seed@example.com"]);
        run_git(&seed, &["config", "user.name", "Seed"]);

        remote.write_seed("README.md", "# Site\n");
        remote.write_seed("content/posts/hello.md", HELLO);
        remote.write_seed("content/posts/notes.txt", "not exposed\n");
        remote.write_seed("content/img/logo.png", "png");
        run_git(&seed, &["add", "."]);
        run_git(&seed, &["commit", "-q", "-m", "Initial commit"]);

        let bare = remote.bare();
        let bare = bare.to_str().unwrap();
        run_git(&seed, &["push", "-q", bare, "HEAD:refs/heads/main"]);
        run_git(&seed, &["--git-dir", bare, "symbolic-ref", "HEAD", "refs/heads/main"]);
        remote
    }

    pub fn bare(&self) -> PathBuf {
        self.dir.path().join("remote.git")
    }

    fn seed(&self) -> PathBuf {
        self.dir.path().join("seed")
    }

    pub fn url(&self) -> String {
        self.bare().to_string_lossy().into_owned()
    }

    fn write_seed(&self, path: &str, contents: &str) {
        let full = self.seed().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, contents).unwrap();
    }

    /// Commit `path` on top of the remote's `main` and push it.
    pub fn push_change(&self, path: &str, contents: &str) -> String {
        let seed = self.seed();
        let bare = self.url();
        run_git(&seed, &["fetch", "-q", &bare, "main"]);
        run_git(&seed, &["reset", "-q", "--hard", "FETCH_HEAD"]);
        self.write_seed(path, contents);
        run_git(&seed, &["add", path]);
        run_git(&seed, &["commit", "-q", "-m", &format!("edit {path}")]);
        run_git(&seed, &["push", "-q", &bare, "HEAD:refs/heads/main"]);
        self.rev_parse("refs/heads/main")
    }

    /// Resolve `rev` in the bare repository.
    pub fn rev_parse(&self, rev: &str) -> String {
        run_git(self.dir.path(), &["--git-dir", &self.url(), "rev-parse", rev])
    }

    /// `git cat-file -t` in the bare repository.
    pub fn object_type(&self, rev: &str) -> String {
        run_git(self.dir.path(), &["--git-dir", &self.url(), "cat-file", "-t", rev])
    }

    /// Commit subjects on `main`, newest first.
    pub fn log(&self) -> Vec<String> {
        run_git(
            self.dir.path(),
            &["--git-dir", &self.url(), "log", "--format=%s", "main"],
        )
        .lines()
        .map(str::to_string)
        .collect()
    }
}

pub fn settings() -> SiteSettings {
    SiteSettings {
        remote: RemoteOptions::new(RemoteAuth::default(), Duration::from_secs(60)),
        committer: Identity::new("Test Bot", "bot@example.com"),
        lock_timeout: Duration::from_secs(10),
    }
}

pub fn site_config(remote: &Remote) -> SiteConfig {
    SiteConfig {
        git: remote.url(),
        base_dir: "content".to_string(),
        extensions_allowed: vec![".md".to_string()],
        tag: Some(TagName::new("release").unwrap()),
        ..Default::default()
    }
}

/// A site named `blog` cloned from a fresh remote.
pub struct Fixture {
    pub remote: Remote,
    pub workspace: TempDir,
    pub site: SiteRepo,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut SiteConfig)) -> Self {
        let remote = Remote::new();
        let workspace = TempDir::new().expect("failed to create workspace");
        let mut config = site_config(&remote);
        adjust(&mut config);
        let site = SiteRegistry::clone_site(workspace.path(), "blog", config, settings())
            .expect("failed to clone site");
        Self {
            remote,
            workspace,
            site,
        }
    }

    /// Move the site into a service, keeping the remote and workspace.
    pub fn into_service(self) -> (SiteService, Remote, TempDir) {
        let registry = SiteRegistry::from_sites([self.site]);
        (SiteService::new(Arc::new(registry)), self.remote, self.workspace)
    }

    /// Run git in the site's working copy.
    pub fn git(&self, args: &[&str]) -> String {
        run_git(self.site.work_dir(), args)
    }
}
