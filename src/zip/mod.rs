//! ZIP container encoding.
//!
//! This module writes standard ZIP archives in a single forward pass, so
//! the output can be any [`std::io::Write`] (a file, a pipe, a `Vec<u8>`).
//!
//! ## Architecture
//!
//! - [`structures`]: On-disk records (local headers, data descriptors, central
//!   directory, end of central directory) and their little-endian encoders
//! - [`writer`]: [`ZipWriter`], which lays those records out entry by entry
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for entries and archives beyond 4GB / 65535 entries
//! - STORED (no compression) and DEFLATE methods
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No archive or entry comments

mod structures;
mod writer;

pub use structures::*;
pub use writer::{EntryHeader, ZipWriter};
