//! `serve` command: clone all sites and run the HTTP server.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::{check_keys, load_config};
use crate::cli::args::ServeArgs;
use crate::core::config::Config;
use crate::server;
use crate::service::SiteService;
use crate::site::SiteRegistry;

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, args: ServeArgs) -> Result<()> {
    let file = &mut config.file;
    if let Some(listener) = args.listener {
        file.listener = Some(listener);
    }
    if let Some(workspace) = args.workspace {
        file.workspace = Some(workspace);
    }
    if let Some(dir) = args.static_dir {
        file.static_dir = Some(dir);
    }

    let auth = file.auth.get_or_insert_with(Default::default);
    if let Some(key) = args.key {
        auth.key = Some(key);
    }
    if let Some(pass) = args.pass {
        auth.passphrase = Some(pass);
    } else if args.ask_pass {
        let pass = rpassword::prompt_password("SSH key passphrase: ")
            .context("failed to read passphrase")?;
        auth.passphrase = Some(pass);
    }
    Ok(())
}

/// Clone every site, then serve until Ctrl-C.
pub fn serve(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, args)?;
    check_keys(&config)?;

    let workspace = config.workspace();
    tracing::info!(workspace = %workspace.display(), sites = config.sites().len(), "preparing sites");
    let registry = SiteRegistry::clone_all(&config).context("failed to prepare sites")?;

    let service = SiteService::new(Arc::new(registry));
    let static_dir = config.static_dir();
    let app = server::router(service, static_dir.as_deref(), config.max_body_bytes());

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    rt.block_on(server::serve(config.listener(), app))
        .with_context(|| format!("server on {} failed", config.listener()))
}
