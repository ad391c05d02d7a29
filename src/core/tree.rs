//! core::tree
//!
//! Content tree indexer.
//!
//! Walks a directory through a [`ContentFs`] and produces a [`Node`] tree
//! containing only files with an allowed extension. Directories that end up
//! without children are pruned, so every emitted directory leads to at
//! least one allowed file.
//!
//! # Invariants
//!
//! - A file node is emitted only if its name ends with an allowed extension.
//!   An empty extension list therefore yields no files at all.
//! - A directory node is never emitted with zero children.
//! - `.git` directories are never entered.
//! - Symbolic links are skipped; reads through them are refused anyway.
//! - Any stat or listing failure aborts the walk; partial trees are never
//!   returned.
//! - Children appear in the order the filesystem lists them.

use serde::Serialize;
use thiserror::Error;

use crate::fs::{ContentFs, EntryKind, FsError};

/// Error from indexing a tree.
#[derive(Debug, Error)]
#[error("failed to index {path}: {source}")]
pub struct TreeError {
    /// The path whose stat or listing failed
    pub path: String,
    #[source]
    pub source: FsError,
}

/// An entry of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub name: String,
    pub is_dir: bool,
    /// Path relative to the site's content root, with a leading `/`
    /// (empty for the root itself).
    pub full_path: String,
    pub children: Vec<Node>,
}

impl Node {
    /// An empty directory node, used when a whole tree was pruned.
    pub fn empty_root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
            full_path: String::new(),
            children: Vec::new(),
        }
    }

    /// Iterate over every file node below (and including) this one.
    pub fn files(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        if self.is_dir {
            Box::new(self.children.iter().flat_map(Node::files))
        } else {
            Box::new(std::iter::once(self))
        }
    }
}

/// Whether `name` carries one of the allowed extensions.
pub fn is_allowed(name: &str, allowed_extensions: &[String]) -> bool {
    allowed_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn display_path(path: &str, trim_prefix: &str) -> String {
    let trimmed = path
        .strip_prefix(trim_prefix)
        .unwrap_or(path)
        .trim_start_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Index the tree rooted at `root`.
///
/// Returns `Ok(None)` when `root` itself is pruned (a directory without any
/// allowed file below it, or a file with a disallowed extension).
///
/// # Example
///
/// ```
/// use mycro::core::tree::index;
/// use mycro::fs::MemoryFs;
///
/// let fs = MemoryFs::new()
///     .with_file("content/posts/a.md", "# A")
///     .with_file("content/posts/a.png", "png")
///     .with_file("content/drafts/notes.txt", "");
///
/// let tree = index("content", &fs, "content", &[".md".to_string()]).unwrap().unwrap();
/// assert_eq!(tree.children.len(), 1);
/// assert_eq!(tree.children[0].children[0].full_path, "/posts/a.md");
/// ```
pub fn index(
    root: &str,
    fs: &dyn ContentFs,
    trim_prefix: &str,
    allowed_extensions: &[String],
) -> Result<Option<Node>, TreeError> {
    let entry = fs.stat(root).map_err(|source| TreeError {
        path: root.to_string(),
        source,
    })?;

    if !entry.is_dir() {
        if !is_allowed(&entry.name, allowed_extensions) {
            return Ok(None);
        }
        return Ok(Some(Node {
            name: entry.name,
            is_dir: false,
            full_path: display_path(root, trim_prefix),
            children: Vec::new(),
        }));
    }

    let listing = fs.read_dir(root).map_err(|source| TreeError {
        path: root.to_string(),
        source,
    })?;

    let mut children = Vec::new();
    for child in listing {
        if child.kind == EntryKind::Symlink || (child.is_dir() && child.name == ".git") {
            continue;
        }
        let path = child_path(root, &child.name);
        if let Some(node) = index(&path, fs, trim_prefix, allowed_extensions)? {
            children.push(node);
        }
    }

    if children.is_empty() {
        return Ok(None);
    }

    Ok(Some(Node {
        name: entry.name,
        is_dir: true,
        full_path: display_path(root, trim_prefix),
        children,
    }))
}
