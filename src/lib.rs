//! # dzip
//!
//! A zip utility whose output depends only on the content of its inputs.
//!
//! Ordinary zip tools record modification times, full permission bits and
//! whatever order the filesystem lists directories in, so zipping the same
//! tree twice rarely gives the same bytes. dzip strips all of that:
//!
//! - Top-level inputs are sorted by path, and directory trees are walked in
//!   name order at every level
//! - Every entry carries the same fixed timestamp (1980-01-01 00:00:00)
//! - Permissions collapse to read-only (`0444`) or read+execute (`0555`),
//!   depending only on whether any execute bit is set
//! - File data is always deflate-compressed
//!
//! The archive bytes are still subject to the deflate implementation: a
//! different `flate2` backend or version may encode the same input
//! differently.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use dzip::{ArchiveBuilder, BuildOptions};
//!
//! fn main() -> dzip::Result<()> {
//!     let builder = ArchiveBuilder::new(BuildOptions::default());
//!     let summary = builder.build(Path::new("out.zip"), &["src", "README.md"])?;
//!     println!("{} files, {} directories", summary.files, summary.directories);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use archive::{ArchiveBuilder, BuildOptions, BuildSummary};
pub use cli::Cli;
pub use error::{BuildError, Result};
