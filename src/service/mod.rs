//! service
//!
//! Site operation facade.
//!
//! Resolves a site by name, applies the tree indexer and the document
//! codec, and turns every failure into a [`ServiceError`] of exactly one
//! [`ErrorKind`]. The HTTP layer is its only caller.
//!
//! # Paths
//!
//! Request paths are relative to the site's `base_dir`. They are parsed
//! into a [`ContentPath`] before anything touches the filesystem, so `..`
//! and `.git` components never get through.

mod error;

pub use error::{ErrorKind, ServiceError};

use std::sync::Arc;

use serde::Serialize;

use crate::core::frontmatter;
use crate::core::tree::{self, Node};
use crate::core::types::{BranchName, ContentPath, Section, TagName};
use crate::git::{CommitRecord, PullOutcome, StatusReport};
use crate::site::{PublishReport, SiteRegistry, SiteRepo};

/// Public description of a site. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub name: String,
    pub git: String,
    pub base_dir: String,
    pub extensions_allowed: Vec<String>,
    pub tag: Option<TagName>,
    pub branch: Option<BranchName>,
}

impl From<&SiteRepo> for SiteSummary {
    fn from(site: &SiteRepo) -> Self {
        let config = site.config();
        Self {
            name: site.name().to_string(),
            git: config.git.clone(),
            base_dir: config.base_dir.clone(),
            extensions_allowed: config.extensions_allowed.clone(),
            tag: config.tag.clone(),
            branch: config.branch.clone(),
        }
    }
}

/// Operations on the registered sites.
#[derive(Debug, Clone)]
pub struct SiteService {
    registry: Arc<SiteRegistry>,
}

impl SiteService {
    pub fn new(registry: Arc<SiteRegistry>) -> Self {
        Self { registry }
    }

    /// Look up a site by name.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NotFound`] if no such site is configured.
    pub fn resolve_site(&self, name: &str) -> Result<&SiteRepo, ServiceError> {
        self.registry
            .get(name)
            .ok_or_else(|| ServiceError::not_found(format!("site '{name}' not found")))
    }

    /// All sites, in name order.
    pub fn list_sites(&self) -> Vec<SiteSummary> {
        self.registry.iter().map(SiteSummary::from).collect()
    }

    /// Storage path of a request path (relative to the working directory).
    fn storage_path(site: &SiteRepo, raw_path: &str) -> Result<String, ServiceError> {
        let path = ContentPath::new(raw_path)?;
        Ok(path.under(&site.config().base_dir))
    }

    /// Read a file, or one section of it.
    pub fn read_file(
        &self,
        site: &str,
        raw_path: &str,
        section: Section,
    ) -> Result<Vec<u8>, ServiceError> {
        let site = self.resolve_site(site)?;
        let path = Self::storage_path(site, raw_path)?;
        let contents = site.fs().read(&path)?;

        if !section.is_partial() {
            return Ok(contents);
        }
        let parts = frontmatter::split(&contents)?;
        Ok(parts.section(section).unwrap_or_default().to_vec())
    }

    /// Write a file (or replace one section of it) and commit it.
    pub async fn write_file(
        &self,
        site: &str,
        raw_path: &str,
        section: Section,
        contents: Vec<u8>,
    ) -> Result<CommitRecord, ServiceError> {
        let site = self.resolve_site(site)?;
        let path = Self::storage_path(site, raw_path)?;
        Ok(site.write_file(path, section, contents).await?)
    }

    /// The filtered content tree below the site's `base_dir`.
    ///
    /// A tree without any allowed file is an empty root node.
    pub fn list_tree(&self, site: &str) -> Result<Node, ServiceError> {
        let site = self.resolve_site(site)?;
        let config = site.config();
        let base_dir = config.base_dir.as_str();

        let node = tree::index(base_dir, site.fs(), base_dir, &config.extensions_allowed)?;
        Ok(node.unwrap_or_else(|| {
            Node::empty_root(base_dir.rsplit('/').next().unwrap_or(base_dir))
        }))
    }

    pub async fn status(&self, site: &str) -> Result<StatusReport, ServiceError> {
        let site = self.resolve_site(site)?;
        Ok(site.status().await?)
    }

    /// Pull the site's branch from its remote.
    pub async fn update(&self, site: &str) -> Result<PullOutcome, ServiceError> {
        let site = self.resolve_site(site)?;
        Ok(site.pull().await?)
    }

    /// Tag (if configured) and push the site.
    pub async fn publish(&self, site: &str) -> Result<PublishReport, ServiceError> {
        let site = self.resolve_site(site)?;
        Ok(site.publish().await?)
    }
}
