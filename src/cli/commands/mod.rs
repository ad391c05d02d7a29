//! cli::commands
//!
//! Command handlers.
//!
//! Handlers are synchronous. `serve` builds the tokio runtime itself once
//! the (blocking) clones are done.

mod check;
mod serve;

pub use check::check;
pub use serve::serve;

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::config::Config;

/// Make sure every SSH key the sites will use can be read.
///
/// Fails before anything is cloned, so a typo in a key path does not
/// surface as an authentication error from the remote.
pub(crate) fn check_keys(config: &Config) -> Result<()> {
    for (name, site) in config.sites() {
        if let Some(key) = config.site_key(site) {
            if let Err(e) = std::fs::File::open(&key) {
                bail!("site '{name}': cannot read SSH key {}: {e}", key.display());
            }
        }
    }
    Ok(())
}

/// Load configuration, naming the file in errors.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).context("failed to load configuration")?;
    if let Some(path) = config.loaded_from() {
        tracing::debug!(path = %path.display(), "configuration loaded");
    }
    Ok(config)
}
