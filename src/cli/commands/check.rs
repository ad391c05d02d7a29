//! `check` command: validate configuration and credentials.

use std::path::Path;

use anyhow::Result;

use super::{check_keys, load_config};

/// Load and validate the configuration, check key files, and print a
/// summary of the configured sites. Nothing is cloned.
pub fn check(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    check_keys(&config)?;

    if let Some(path) = config.loaded_from() {
        println!("config:    {}", path.display());
    }
    println!("listener:  {}", config.listener());
    println!("workspace: {}", config.workspace().display());
    for (name, site) in config.sites() {
        let tag = site.tag.as_ref().map(|t| t.as_str()).unwrap_or("-");
        println!(
            "site {name}: {} (base_dir: /{}, tag: {tag}, extensions: {})",
            site.git,
            site.base_dir,
            site.extensions_allowed.join(" ")
        );
    }
    println!("ok");
    Ok(())
}
