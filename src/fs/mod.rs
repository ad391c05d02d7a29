//! fs
//!
//! Filesystem capability for site working trees.
//!
//! # Architecture
//!
//! Everything that reads or writes working-tree bytes goes through the
//! [`ContentFs`] trait. Paths are `/`-separated and relative to the
//! filesystem's root; the empty string names the root itself.
//!
//! - [`DiskFs`] - `std::fs` rooted at a site's checkout
//! - [`MemoryFs`] - in-memory tree for tests of the indexer and codec paths
//!
//! # Ordering
//!
//! [`ContentFs::read_dir`] returns entries sorted by name for both
//! implementations, so tree listings are deterministic.

mod disk;
mod memory;
mod traits;

pub use disk::DiskFs;
pub use memory::MemoryFs;
pub use traits::{ContentFs, EntryKind, FsEntry, FsError};
