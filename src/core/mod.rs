//! core
//!
//! Core domain types, codecs, and configuration for mycro.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, TagName, Oid, ContentPath, Section
//! - [`frontmatter`] - Front matter / body document codec
//! - [`tree`] - Filtered content tree indexer
//! - [`config`] - Configuration schema and loading
//! - [`lock`] - Cross-process lock on a site's working copy
//!
//! Nothing in here touches git or the network.

pub mod config;
pub mod frontmatter;
pub mod lock;
pub mod tree;
pub mod types;
