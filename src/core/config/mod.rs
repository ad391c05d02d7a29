//! core::config
//!
//! Configuration schema and loading.
//!
//! # Config Locations
//!
//! Searched in order, the first existing file wins:
//! 1. The path given with `--config`
//! 2. `$MYCRO_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/mycro/config.toml`
//! 4. `~/.mycro/config.toml`
//! 5. `./cms.toml`
//!
//! An explicit `--config` path that does not exist is an error; it is never
//! silently replaced by a file found further down the list.
//!
//! # Precedence
//!
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (applied by the `serve` command)
//!
//! # Example
//!
//! ```
//! use mycro::core::config::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     [sites.blog]
//!     git = "/srv/git/blog.git"
//!     base_dir = "/content/"
//!     extensions_allowed = [".md"]
//! "#, None).unwrap();
//!
//! assert_eq!(config.sites()["blog"].base_dir, "content");
//! assert_eq!(config.listener(), "0.0.0.0:8765");
//! ```

pub mod schema;

pub use schema::{AuthConfig, FileConfig, Identity, SiteConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Default HTTP listen address.
pub const DEFAULT_LISTENER: &str = "0.0.0.0:8765";

/// Default upload limit in MiB.
pub const DEFAULT_MAX_BODY_MIB: u64 = 32;

/// Default config file name in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "cms.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("no config file found (searched: {})", .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    NotFound { searched: Vec<PathBuf> },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded, validated configuration.
///
/// Accessors apply defaults; the raw file values stay reachable through
/// [`Config::file`] so CLI flags can override them.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values as read from the file (plus CLI overrides)
    pub file: FileConfig,
    /// Path the config was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Locate, read, parse and validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if no candidate file exists
    /// - [`ConfigError::ReadError`] / [`ConfigError::ParseError`] for bad files
    /// - [`ConfigError::InvalidValue`] if validation fails
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::locate(explicit)?;
        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        Self::from_toml_str(&contents, Some(path))
    }

    /// Find the config file to load.
    fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(ConfigError::NotFound {
                searched: vec![path.to_path_buf()],
            });
        }

        let candidates = Self::candidates();
        candidates
            .iter()
            .find(|p| p.exists())
            .cloned()
            .ok_or(ConfigError::NotFound {
                searched: candidates,
            })
    }

    /// Implicit search locations, in order.
    fn candidates() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("MYCRO_CONFIG") {
            paths.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_home).join("mycro/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mycro/config.toml"));
        }
        paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
        paths
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// `path` is only used in error messages and [`Config::loaded_from`].
    pub fn from_toml_str(contents: &str, path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.clone().unwrap_or_default(),
            message: e.to_string(),
        })?;

        for site in file.sites.values_mut() {
            site.base_dir = site.base_dir.trim_matches('/').to_string();
        }

        file.validate()?;
        Ok(Self { file, path })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    pub fn listener(&self) -> &str {
        self.file.listener.as_deref().unwrap_or(DEFAULT_LISTENER)
    }

    /// Directory the sites are cloned into.
    ///
    /// Defaults to `<tmp>/mycro`.
    pub fn workspace(&self) -> PathBuf {
        self.file
            .workspace
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| std::env::temp_dir().join("mycro"))
    }

    pub fn static_dir(&self) -> Option<PathBuf> {
        self.file.static_dir.as_deref().map(expand_home)
    }

    /// Defaults to 10 seconds.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.file.lock_timeout_secs.unwrap_or(10))
    }

    /// Defaults to 120 seconds.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.file.remote_timeout_secs.unwrap_or(120))
    }

    /// Largest accepted request body in bytes. Defaults to 32 MiB.
    pub fn max_body_bytes(&self) -> usize {
        let mib = self.file.max_body_mib.unwrap_or(DEFAULT_MAX_BODY_MIB);
        usize::try_from(mib.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }

    pub fn committer(&self) -> Identity {
        self.file.committer.clone().unwrap_or_default()
    }

    pub fn auth(&self) -> AuthConfig {
        let mut auth = self.file.auth.clone().unwrap_or_default();
        auth.key = auth.key.as_deref().map(expand_home);
        auth
    }

    /// SSH key used for `site`: its own key, else the global one.
    pub fn site_key(&self, site: &SiteConfig) -> Option<PathBuf> {
        site.key
            .as_deref()
            .map(expand_home)
            .or_else(|| self.auth().key)
    }

    pub fn sites(&self) -> &std::collections::BTreeMap<String, SiteConfig> {
        &self.file.sites
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
