//! Deterministic archive construction.
//!
//! The pieces, leaves first:
//!
//! - [`header`]: turns an [`ArchiveEntry`] into a [`NormalizedHeader`] with a
//!   fixed timestamp, a two-valued permission class and deflate compression
//! - [`entry`]: the [`ArchiveEntry`] record and [`write_entry`], which streams
//!   one entry into the container
//! - [`walker`]: enumerates a directory tree in a fixed order
//! - [`builder`]: [`ArchiveBuilder`], which sorts the inputs and drives the rest
//!
//! Nothing here consults the clock, file ownership or traversal order of the
//! host filesystem, so the same logical input always produces the same bytes.

mod builder;
mod entry;
mod header;
mod walker;

pub use builder::{ArchiveBuilder, BuildSummary};
pub use entry::{ArchiveEntry, EntryKind, entry_name, write_entry};
pub use header::{NormalizedHeader, PermissionClass, is_executable, normalize};
pub use walker::{TreeWalker, walk};

/// Build settings, fixed for the lifetime of an [`ArchiveBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Store files under their base name only and emit no directory entries.
    pub junk_paths: bool,
    /// Replace an existing output file instead of failing.
    pub overwrite: bool,
}
