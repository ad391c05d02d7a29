//! site::registry
//!
//! Name to binding map, built once at startup.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::{SiteError, SiteRepo, SiteSettings};
use crate::core::config::{Config, SiteConfig};
use crate::core::lock::WorkspaceLock;
use crate::fs::DiskFs;
use crate::git::{self, Git, RemoteAuth, RemoteOptions};

/// All managed sites, keyed by name.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: BTreeMap<String, SiteRepo>,
}

impl SiteRegistry {
    /// Build a registry from already bound sites.
    pub fn from_sites(sites: impl IntoIterator<Item = SiteRepo>) -> Self {
        Self {
            sites: sites
                .into_iter()
                .map(|site| (site.name().to_string(), site))
                .collect(),
        }
    }

    /// Clone every configured site into the workspace.
    ///
    /// Blocking: performs one network clone per site. Any failure aborts
    /// startup. Also sets the process-wide socket timeouts from
    /// `remote_timeout_secs`, so it must run before the server starts.
    pub fn clone_all(config: &Config) -> Result<Self, SiteError> {
        git::set_network_timeouts(config.remote_timeout())?;
        let workspace = config.workspace();
        let auth = config.auth();
        let mut sites = Vec::with_capacity(config.sites().len());

        for (name, site) in config.sites() {
            let settings = SiteSettings {
                remote: RemoteOptions::new(
                    RemoteAuth {
                        key: config.site_key(site),
                        passphrase: auth.passphrase.clone(),
                    },
                    config.remote_timeout(),
                ),
                committer: config.committer(),
                lock_timeout: config.lock_timeout(),
            };
            sites.push(Self::clone_site(&workspace, name, site.clone(), settings)?);
        }

        Ok(Self::from_sites(sites))
    }

    /// Take the workspace lock for `name`, then make a fresh clone at
    /// `<workspace>/<name>`, replacing whatever was there.
    pub fn clone_site(
        workspace: &Path,
        name: &str,
        config: SiteConfig,
        settings: SiteSettings,
    ) -> Result<SiteRepo, SiteError> {
        let lock = WorkspaceLock::acquire(workspace, name)?;
        let path = workspace.join(name);

        if path.exists() {
            tracing::debug!(site = name, path = %path.display(), "removing previous checkout");
            std::fs::remove_dir_all(&path).map_err(|source| SiteError::Workspace {
                path: path.clone(),
                source,
            })?;
        }

        tracing::info!(site = name, remote = %config.git, "cloning");
        let git = Git::clone(&config.git, &path, &settings.remote, config.branch.as_ref())?;
        if let Ok(head) = git.head_oid() {
            tracing::info!(site = name, revision = %head.short(7), "checked out");
        }

        let fs = Arc::new(DiskFs::new(&path));
        Ok(SiteRepo::new(name, config, settings, git, fs)?.holding(lock))
    }

    /// Look up a site.
    pub fn get(&self, name: &str) -> Option<&SiteRepo> {
        self.sites.get(name)
    }

    /// All sites in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteRepo> {
        self.sites.values()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
