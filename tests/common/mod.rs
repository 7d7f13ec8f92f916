//! Minimal ZIP reader used to inspect archives produced in tests.
//!
//! Reads the End of Central Directory first, then the Central Directory,
//! then inflates entry data from behind each Local File Header.

#![allow(dead_code)]

use anyhow::{Result, bail};
use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};
use std::path::Path;

const EOCD_SIGNATURE: &[u8] = b"PK\x05\x06";
const EOCD_SIZE: usize = 22;
const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
const LFH_SIZE: usize = 30;

/// One central directory record.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub version_made_by: u16,
    pub flags: u16,
    pub method: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub external_attrs: u32,
    pub lfh_offset: u64,
}

impl Entry {
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Unix permission bits from the external attributes.
    pub fn unix_mode(&self) -> u32 {
        self.external_attrs >> 16
    }
}

pub struct Archive {
    data: Vec<u8>,
    pub entries: Vec<Entry>,
}

impl Archive {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < EOCD_SIZE {
            bail!("Not a valid ZIP file");
        }
        // Archives under test never carry a comment
        let eocd = &data[data.len() - EOCD_SIZE..];
        if &eocd[0..4] != EOCD_SIGNATURE {
            bail!("Invalid End of Central Directory");
        }

        let mut cursor = Cursor::new(&eocd[10..]);
        let total_entries = cursor.read_u16::<LittleEndian>()?;
        let _cd_size = cursor.read_u32::<LittleEndian>()?;
        let cd_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut cursor = Cursor::new(&data[..]);
        cursor.set_position(cd_offset);
        let mut entries = Vec::with_capacity(total_entries as usize);
        for _ in 0..total_entries {
            entries.push(parse_cdfh(&mut cursor)?);
        }

        Ok(Self { data, entries })
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Decompressed content of the named entry.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let Some(entry) = self.entry(name) else {
            bail!("no entry named {name}");
        };

        let lfh = &self.data[entry.lfh_offset as usize..];
        if &lfh[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header");
        }
        let mut cursor = Cursor::new(&lfh[26..]);
        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        let start = LFH_SIZE + file_name_length + extra_field_length;
        let raw = &lfh[start..start + entry.compressed_size as usize];

        let mut out = Vec::new();
        match entry.method {
            0 => out.extend_from_slice(raw),
            8 => {
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
            }
            other => bail!("Unsupported compression method: {other}"),
        }

        let mut crc = flate2::Crc::new();
        crc.update(&out);
        if crc.sum() != entry.crc32 {
            bail!("CRC mismatch for {name}");
        }
        Ok(out)
    }
}

fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<Entry> {
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        bail!("Invalid Central Directory File Header");
    }

    let version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let flags = cursor.read_u16::<LittleEndian>()?;
    let method = cursor.read_u16::<LittleEndian>()?;
    let mod_time = cursor.read_u16::<LittleEndian>()?;
    let mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let external_attrs = cursor.read_u32::<LittleEndian>()?;
    let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes)?;
    let name = String::from_utf8(file_name_bytes)?;

    // Skip extra field and comment; archives under test stay below ZIP64 sizes
    cursor.set_position(cursor.position() + extra_field_length as u64 + file_comment_length as u64);

    Ok(Entry {
        name,
        version_made_by,
        flags,
        method,
        mod_time,
        mod_date,
        crc32,
        compressed_size,
        uncompressed_size,
        external_attrs,
        lfh_offset,
    })
}
