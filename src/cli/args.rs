//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--config <path>`: Configuration file (otherwise searched, see
//!   [`crate::core::config`])
//! - `--debug`: Enable debug logging

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Mycro - a headless, git-backed content management server
#[derive(Parser, Debug)]
#[command(name = "mycro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clone all sites and serve the HTTP API
    Serve(ServeArgs),

    /// Validate the configuration and credentials without cloning
    Check,
}

/// Flags of `serve`; each overrides the matching config value.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to listen on, e.g. 0.0.0.0:8765
    #[arg(long, short)]
    pub listener: Option<String>,

    /// SSH private key for all sites without their own key
    #[arg(long, short)]
    pub key: Option<PathBuf>,

    /// Passphrase of the SSH key
    #[arg(long, env = "MYCRO_KEY_PASSPHRASE", hide_env_values = true, conflicts_with = "ask_pass")]
    pub pass: Option<String>,

    /// Prompt for the SSH key passphrase
    #[arg(long)]
    pub ask_pass: bool,

    /// Directory served at / (editor UI)
    #[arg(long = "static", value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Directory the sites are cloned into
    #[arg(long, short)]
    pub workspace: Option<PathBuf>,
}
