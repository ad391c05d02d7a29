//! cli
//!
//! Command-line interface layer for mycro.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging
//! - Load configuration and hand it to the command handlers
//!
//! Startup failures (bad config, unreadable key, failed clone) surface
//! here as `anyhow` errors and end the process with exit code 1.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, ServeArgs};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let config_path = cli.config.as_deref();
    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => commands::serve(config_path, args),
        Command::Check => commands::check(config_path),
    }
}

/// `--debug` forces debug level; otherwise `RUST_LOG`, defaulting to info.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
