//! core::frontmatter
//!
//! Codec for two-section documents: a front matter block followed by a body.
//!
//! # Format
//!
//! ```text
//! ---\n
//! <front matter>
//! ---\n
//! <body>
//! ```
//!
//! The front matter is the byte range between the first and the second
//! occurrence of [`MARKER`]; the body is everything after the second. Bytes
//! in front of the first marker belong to neither section.
//!
//! # Invariants
//!
//! - A document with fewer than two markers is a [`FrontmatterError::Format`],
//!   never treated as "all body".
//! - [`join`] reassembles marker, front matter, marker, body byte for byte.
//!   Nothing is re-encoded and line endings are left alone.
//!
//! # Example
//!
//! ```
//! use mycro::core::frontmatter::{join, split};
//! use mycro::core::types::Section;
//!
//! let doc = b"---\ntitle: Hi\n---\nHello\n";
//! let parts = split(doc).unwrap();
//! assert_eq!(parts.frontmatter, b"title: Hi\n");
//! assert_eq!(parts.body, b"Hello\n");
//!
//! let edited = join(doc, b"Bye\n", Section::Body).unwrap();
//! assert_eq!(edited, b"---\ntitle: Hi\n---\nBye\n");
//! ```

use thiserror::Error;

use crate::core::types::Section;

/// The delimiter line separating the sections.
pub const MARKER: &[u8] = b"---\n";

/// Errors from splitting or joining documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontmatterError {
    /// The document does not contain two markers.
    #[error("document does not look like front matter and body: expected 2 '---' markers, found {found}")]
    Format {
        /// Number of markers found (0 or 1)
        found: usize,
    },

    /// `join` was asked to replace the whole document.
    #[error("section 'all' cannot be joined, write the document instead")]
    WholeDocument,
}

/// The two sections of a document, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parts<'a> {
    pub frontmatter: &'a [u8],
    pub body: &'a [u8],
}

impl<'a> Parts<'a> {
    /// Get the bytes of one section. [`Section::All`] yields `None`.
    pub fn section(&self, section: Section) -> Option<&'a [u8]> {
        match section {
            Section::All => None,
            Section::Frontmatter => Some(self.frontmatter),
            Section::Body => Some(self.body),
        }
    }
}

fn find(haystack: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(MARKER.len())
        .position(|w| w == MARKER)
        .map(|pos| pos + from)
}

/// Split a document into front matter and body.
pub fn split(document: &[u8]) -> Result<Parts<'_>, FrontmatterError> {
    let first = find(document, 0).ok_or(FrontmatterError::Format { found: 0 })?;
    let fm_start = first + MARKER.len();
    let second = find(document, fm_start).ok_or(FrontmatterError::Format { found: 1 })?;

    Ok(Parts {
        frontmatter: &document[fm_start..second],
        body: &document[second + MARKER.len()..],
    })
}

/// Replace one section of `original` with `replacement`.
pub fn join(
    original: &[u8],
    replacement: &[u8],
    section: Section,
) -> Result<Vec<u8>, FrontmatterError> {
    let parts = split(original)?;
    let (frontmatter, body) = match section {
        Section::Frontmatter => (replacement, parts.body),
        Section::Body => (parts.frontmatter, replacement),
        Section::All => return Err(FrontmatterError::WholeDocument),
    };

    let mut out = Vec::with_capacity(2 * MARKER.len() + frontmatter.len() + body.len());
    out.extend_from_slice(MARKER);
    out.extend_from_slice(frontmatter);
    out.extend_from_slice(MARKER);
    out.extend_from_slice(body);
    Ok(out)
}
