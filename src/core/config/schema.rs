//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! listener = "0.0.0.0:8765"
//! workspace = "/var/lib/mycro"
//! lock_timeout_secs = 10
//! remote_timeout_secs = 120
//! max_body_mib = 32
//!
//! [auth]
//! key = "~/.ssh/id_rsa"
//!
//! [committer]
//! name = "mycro"
//! email = "mycro@localhost"
//!
//! [sites.blog]
//! git = "git@example.com:org/blog.git"
//! base_dir = "/content/"
//! extensions_allowed = [".md"]
//! tag = "release"
//! ```
//!
//! # Validation
//!
//! Tag and branch names are validated while parsing (invalid names are a
//! parse error). Everything else is checked by [`FileConfig::validate`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{BranchName, TagName};

/// The whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Address the HTTP server binds to
    pub listener: Option<String>,

    /// Directory the sites are cloned into
    pub workspace: Option<PathBuf>,

    /// Directory served at `/` (editor UI)
    pub static_dir: Option<PathBuf>,

    /// Maximum wait for a site's lock, in seconds
    pub lock_timeout_secs: Option<u64>,

    /// Maximum duration of a clone, fetch, or push, in seconds
    pub remote_timeout_secs: Option<u64>,

    /// Largest accepted file upload, in MiB
    pub max_body_mib: Option<u64>,

    /// Credentials for remote access
    pub auth: Option<AuthConfig>,

    /// Identity recorded on commits and tags
    pub committer: Option<Identity>,

    /// Managed sites by name
    pub sites: BTreeMap<String, SiteConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sites.is_empty() {
            return Err(ConfigError::InvalidValue(
                "no sites configured, add at least one [sites.<name>] table".into(),
            ));
        }

        for (name, site) in &self.sites {
            validate_site_name(name)?;
            site.validate(name)?;
        }

        for (key, value) in [
            ("lock_timeout_secs", self.lock_timeout_secs),
            ("remote_timeout_secs", self.remote_timeout_secs),
            ("max_body_mib", self.max_body_mib),
        ] {
            if value == Some(0) {
                return Err(ConfigError::InvalidValue(format!(
                    "{key} must be greater than zero"
                )));
            }
        }

        if let Some(committer) = &self.committer {
            committer.validate()?;
        }

        Ok(())
    }
}

/// Site names appear as a URL path segment.
fn validate_site_name(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !name.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "invalid site name '{name}', use letters, digits, '-', '_' and '.'"
        )))
    }
}

/// One managed site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Remote repository URL
    pub git: String,

    /// SSH private key for this site, overriding `[auth] key`
    pub key: Option<PathBuf>,

    /// Content root inside the repository
    pub base_dir: String,

    /// File suffixes exposed by the tree listing (empty exposes nothing)
    pub extensions_allowed: Vec<String>,

    /// Release tag moved to HEAD on publish
    pub tag: Option<TagName>,

    /// Branch to check out (default: the remote's HEAD)
    pub branch: Option<BranchName>,
}

impl SiteConfig {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.git.trim().is_empty() {
            return Err(ConfigError::InvalidValue(format!(
                "site '{name}': git remote URL is empty"
            )));
        }
        if self.base_dir.split('/').any(|c| c == ".." || c == ".git") {
            return Err(ConfigError::InvalidValue(format!(
                "site '{name}': base_dir '{}' must stay inside the repository",
                self.base_dir
            )));
        }
        if self.extensions_allowed.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "site '{name}': extensions_allowed contains an empty entry"
            )));
        }
        Ok(())
    }
}

/// Remote credentials.
///
/// The passphrase is never printed: `Debug` redacts it and it is skipped
/// when serializing.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// SSH private key path (`~/` is expanded)
    pub key: Option<PathBuf>,

    /// Passphrase of the SSH key
    #[serde(skip_serializing)]
    pub passphrase: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("key", &self.key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Author and tagger identity for everything mycro writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "committer name and email must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("mycro", "mycro@localhost")
    }
}
