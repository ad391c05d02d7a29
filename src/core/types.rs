//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA)
//! - [`BranchName`] / [`TagName`] - Validated Git ref short names
//! - [`Section`] - Which part of a partial document an operation targets
//! - [`ContentPath`] - Normalized, traversal-free path inside a site
//!
//! # Validation
//!
//! These types enforce validity at construction time. Request input that
//! fails validation never reaches the filesystem or the repository.
//!
//! # Examples
//!
//! ```
//! use mycro::core::types::{ContentPath, Section, TagName};
//!
//! let path = ContentPath::new("/posts/hello.md").unwrap();
//! assert_eq!(path.as_str(), "posts/hello.md");
//! assert!(ContentPath::new("/../etc/passwd").is_err());
//!
//! assert_eq!("fm".parse::<Section>().unwrap(), Section::Frontmatter);
//! assert!(TagName::new("bad..tag").is_err());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error("unknown section '{0}', must be one of: all, frontmatter, body")]
    InvalidSection(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Check a ref short name (branch or tag) against Git's refname rules.
///
/// See `git check-ref-format`. `kind` is only used in error messages.
fn validate_ref_name(kind: &str, name: &str) -> Result<(), TypeError> {
    let fail = |why: &str| Err(TypeError::InvalidRefName(format!("{kind} name {why}")));

    if name.is_empty() {
        return fail("cannot be empty");
    }
    if name == "@" {
        return fail("cannot be '@' (reserved)");
    }
    if name.starts_with('-') {
        return fail("cannot start with '-'");
    }
    if name.ends_with('/') {
        return fail("cannot end with '/'");
    }
    if name.contains("..") || name.contains("@{") || name.contains("//") {
        return fail("cannot contain '..', '@{' or '//'");
    }

    const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(TypeError::InvalidRefName(format!(
            "{kind} name cannot contain '{c}'"
        )));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return fail("cannot contain control characters");
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return fail("component cannot start with '.'");
        }
        if component.ends_with(".lock") {
            return fail("component cannot end with '.lock'");
        }
    }

    Ok(())
}

/// A validated Git branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_ref_name("branch", &name)?;
        Ok(Self(name))
    }

    /// The full ref (`refs/heads/<name>`).
    pub fn refname(&self) -> String {
        format!("refs/heads/{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git tag name, used as a site's release tag.
///
/// # Example
///
/// ```
/// use mycro::core::types::TagName;
///
/// let tag = TagName::new("release").unwrap();
/// assert_eq!(tag.refname(), "refs/tags/release");
/// assert!(TagName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Create a new validated tag name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_ref_name("tag", &name)?;
        Ok(Self(name))
    }

    /// The full ref (`refs/tags/<name>`).
    pub fn refname(&self) -> String {
        format!("refs/tags/{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TagName> for String {
    fn from(name: TagName) -> Self {
        name.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA).
///
/// Stored as lowercase hex; SHA-1 (40) and SHA-256 (64) lengths are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id, normalized to lowercase.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid("object id must be hexadecimal".into()));
        }
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// # Example
    ///
    /// ```
    /// use mycro::core::types::Oid;
    ///
    /// let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
    /// assert_eq!(oid.short(7), "abc123d");
    /// ```
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Section selector for file reads and writes.
///
/// Accepts the long names and the short aliases used by the editor UI
/// (`fm` for front matter, `md` for the markdown body). An absent selector
/// means [`Section::All`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// The whole file, unmodified.
    #[default]
    All,
    /// Bytes between the first and second marker.
    Frontmatter,
    /// Bytes after the second marker.
    Body,
}

impl Section {
    /// Parse an optional selector, treating absence as [`Section::All`].
    pub fn from_query(value: Option<&str>) -> Result<Self, TypeError> {
        value.map_or(Ok(Section::All), str::parse)
    }

    /// Whether the selector addresses only part of a document.
    pub fn is_partial(&self) -> bool {
        !matches!(self, Section::All)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::All => "all",
            Section::Frontmatter => "frontmatter",
            Section::Body => "body",
        }
    }
}

impl FromStr for Section {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Section::All),
            "frontmatter" | "fm" => Ok(Section::Frontmatter),
            "body" | "md" => Ok(Section::Body),
            other => Err(TypeError::InvalidSection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized path to a file inside a site's content root.
///
/// Leading, trailing and repeated `/` as well as `.` components are
/// dropped. `..`, any `.git` component, backslashes and NUL bytes are
/// rejected, as is a path that normalizes to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentPath(String);

impl ContentPath {
    pub fn new(raw: &str) -> Result<Self, TypeError> {
        if raw.contains('\0') || raw.contains('\\') {
            return Err(TypeError::InvalidPath(format!(
                "'{raw}' contains a forbidden character"
            )));
        }

        let mut components = Vec::new();
        for component in raw.split('/') {
            match component {
                "" | "." => continue,
                ".." => {
                    return Err(TypeError::InvalidPath(format!(
                        "'{raw}' must not contain '..'"
                    )))
                }
                c if c.eq_ignore_ascii_case(".git") => {
                    return Err(TypeError::InvalidPath(format!(
                        "'{raw}' must not address the .git directory"
                    )))
                }
                c => components.push(c),
            }
        }

        if components.is_empty() {
            return Err(TypeError::InvalidPath("path must name a file".into()));
        }

        Ok(Self(components.join("/")))
    }

    /// Join onto a base directory (already trimmed of `/`).
    ///
    /// # Example
    ///
    /// ```
    /// use mycro::core::types::ContentPath;
    ///
    /// let path = ContentPath::new("a/b.md").unwrap();
    /// assert_eq!(path.under("content"), "content/a/b.md");
    /// assert_eq!(path.under(""), "a/b.md");
    /// ```
    pub fn under(&self, base_dir: &str) -> String {
        if base_dir.is_empty() {
            self.0.clone()
        } else {
            format!("{}/{}", base_dir, self.0)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.0)
    }
}
