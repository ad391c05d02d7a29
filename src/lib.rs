//! Mycro - a headless, git-backed content management server
//!
//! Mycro manages a set of named sites. Each site is a working copy of a
//! remote git repository that can be browsed, edited, and published over
//! HTTP. Every write becomes a commit; publishing moves a release tag and
//! pushes to the remote.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, wires the server)
//! - [`server`] - HTTP routes, handlers, and JSON/YAML rendering
//! - [`service`] - Site operation facade consumed by the HTTP layer
//! - [`site`] - Per-site repository binding and the site registry
//! - [`core`] - Domain types, partial-document codec, tree indexer, config
//! - [`git`] - Single interface for all Git operations
//! - [`fs`] - Filesystem capability for working trees
//!
//! # Correctness Invariants
//!
//! 1. All mutations of a site's repository are serialized by that site's lock
//! 2. Partial writes never truncate the untouched section of a document
//! 3. A failed commit leaves the working tree observably dirty
//! 4. Request paths never escape the site's content root

pub mod cli;
pub mod core;
pub mod fs;
pub mod git;
pub mod server;
pub mod service;
pub mod site;
