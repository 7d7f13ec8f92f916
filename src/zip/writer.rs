//! Streaming ZIP writer.
//!
//! Entries are appended strictly one after another and the output is never
//! seeked. File entries therefore carry their CRC-32 and sizes in a data
//! descriptor after the payload, and the central directory is assembled in
//! memory and written once by [`ZipWriter::finish`].
//!
//! Every byte the writer produces is derived from the [`EntryHeader`]s and
//! payloads it is given, so identical calls always yield identical output.

use flate2::write::DeflateEncoder;
use flate2::{Compression, CrcReader};
use std::io::{self, Read, Write};
use tracing::{trace, warn};

use crate::io::CountingWriter;

use super::structures::*;

/// What the container needs to know about one entry besides its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader<'a> {
    pub name: &'a str,
    pub compression_method: CompressionMethod,
    pub modified: DosDateTime,
    pub external_attrs: u32,
}

/// Write-only ZIP container.
///
/// Dropping a writer that was never [`finish`](ZipWriter::finish)ed still
/// writes the central directory for the entries completed so far; errors on
/// that path can only be logged.
pub struct ZipWriter<W: Write> {
    /// `None` once the central directory has been written
    inner: Option<CountingWriter<W>>,
    central_directory: Vec<CentralDirectoryHeader>,
}

impl<W: Write> ZipWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(CountingWriter::new(inner)),
            central_directory: Vec::new(),
        }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.central_directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.central_directory.is_empty()
    }

    /// Append a directory marker. The name gets a trailing `/` if it lacks one.
    ///
    /// Directory markers are always stored with an empty payload and no data
    /// descriptor, whatever compression method the header asks for.
    pub fn add_directory(&mut self, header: &EntryHeader<'_>) -> io::Result<()> {
        let file_name = if header.name.ends_with('/') {
            header.name.to_string()
        } else {
            format!("{}/", header.name)
        };
        let flags = name_flags(&file_name);

        let w = self.inner.as_mut().ok_or_else(finished)?;
        let lfh_offset = w.count();

        LocalFileHeader {
            version_needed: VERSION_NEEDED,
            flags,
            compression_method: CompressionMethod::Stored,
            modified: header.modified,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name: &file_name,
        }
        .write_to(w)?;

        trace!(name = %file_name, offset = lfh_offset, "directory entry written");

        self.central_directory.push(CentralDirectoryHeader {
            flags,
            compression_method: CompressionMethod::Stored,
            modified: header.modified,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            external_attrs: header.external_attrs,
            lfh_offset,
            file_name,
        });
        Ok(())
    }

    /// Stream `source` to the end into a new file entry.
    ///
    /// Returns the number of uncompressed bytes read from `source`.
    pub fn add_file<R: Read>(&mut self, header: &EntryHeader<'_>, source: R) -> io::Result<u64> {
        let flags = FLAG_DATA_DESCRIPTOR | name_flags(header.name);

        let w = self.inner.as_mut().ok_or_else(finished)?;
        let lfh_offset = w.count();

        LocalFileHeader {
            version_needed: VERSION_NEEDED,
            flags,
            compression_method: header.compression_method,
            modified: header.modified,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name: header.name,
        }
        .write_to(w)?;

        let data_start = w.count();
        let mut source = CrcReader::new(source);
        let uncompressed_size = match header.compression_method {
            CompressionMethod::Deflate => {
                let mut encoder = DeflateEncoder::new(&mut *w, Compression::default());
                let n = io::copy(&mut source, &mut encoder)?;
                encoder.finish()?;
                n
            }
            CompressionMethod::Stored => io::copy(&mut source, &mut *w)?,
        };
        let compressed_size = w.count() - data_start;
        let crc32 = source.crc().sum();

        DataDescriptor {
            crc32,
            compressed_size,
            uncompressed_size,
        }
        .write_to(w)?;

        trace!(
            name = header.name,
            offset = lfh_offset,
            uncompressed_size,
            compressed_size,
            "file entry written"
        );

        self.central_directory.push(CentralDirectoryHeader {
            flags,
            compression_method: header.compression_method,
            modified: header.modified,
            crc32,
            compressed_size,
            uncompressed_size,
            external_attrs: header.external_attrs,
            lfh_offset,
            file_name: header.name.to_string(),
        });
        Ok(uncompressed_size)
    }

    /// Write the central directory and hand back the underlying writer.
    ///
    /// The returned writer is not flushed; buffering writers report their
    /// final flush errors to whoever owns them.
    pub fn finish(mut self) -> io::Result<W> {
        let mut w = self.inner.take().ok_or_else(finished)?;
        write_central_directory(&mut w, &self.central_directory)?;
        Ok(w.into_inner())
    }
}

impl<W: Write> Drop for ZipWriter<W> {
    fn drop(&mut self) {
        if let Some(mut w) = self.inner.take() {
            if let Err(err) = write_central_directory(&mut w, &self.central_directory) {
                warn!(error = %err, "failed to finalize unfinished zip archive");
            }
        }
    }
}

fn write_central_directory<W: Write>(
    w: &mut CountingWriter<W>,
    entries: &[CentralDirectoryHeader],
) -> io::Result<()> {
    let cd_offset = w.count();
    for entry in entries {
        entry.write_to(w)?;
    }

    let eocd = EndOfCentralDirectory {
        total_entries: entries.len() as u64,
        cd_size: w.count() - cd_offset,
        cd_offset,
    };

    if eocd.is_zip64() {
        let eocd64_offset = w.count();
        Zip64EOCD {
            total_entries: eocd.total_entries,
            cd_size: eocd.cd_size,
            cd_offset: eocd.cd_offset,
        }
        .write_to(w)?;
        Zip64EOCDLocator { eocd64_offset }.write_to(w)?;
    }

    eocd.write_to(w)
}

fn name_flags(name: &str) -> u16 {
    if name.is_ascii() { 0 } else { FLAG_UTF8 }
}

fn finished() -> io::Error {
    io::Error::other("zip archive already finalized")
}
