use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// "Version made by": upper byte 3 (Unix), lower byte 20 (APPNOTE 2.0).
pub const VERSION_MADE_BY: u16 = (3 << 8) | 20;
/// Version needed to extract a plain deflate/stored entry.
pub const VERSION_NEEDED: u16 = 20;
/// Version needed once ZIP64 extensions are involved.
pub const VERSION_NEEDED_ZIP64: u16 = 45;

/// CRC and sizes follow the data in a data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
/// File name is encoded as UTF-8.
pub const FLAG_UTF8: u16 = 0x0800;

/// Header id of the ZIP64 extended information extra field.
pub const ZIP64_EXTRA_ID: u16 = 0x0001;

const U32_SENTINEL: u32 = 0xFFFF_FFFF;
const U16_SENTINEL: u16 = 0xFFFF;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
}

impl CompressionMethod {
    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
        }
    }
}

/// MS-DOS packed date and time as stored in ZIP headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    pub date: u16,
    pub time: u16,
}

impl DosDateTime {
    /// 1980-01-01 00:00:00, the earliest instant the format can express.
    pub const EPOCH: DosDateTime = DosDateTime {
        date: (1 << 5) | 1,
        time: 0,
    };

    /// Parse the date to (year, month, day)
    pub fn date_parts(&self) -> (u16, u8, u8) {
        let day = (self.date & 0x1F) as u8;
        let month = ((self.date >> 5) & 0x0F) as u8;
        let year = ((self.date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse the time to (hour, minute, second)
    pub fn time_parts(&self) -> (u8, u8, u8) {
        let second = ((self.time & 0x1F) * 2) as u8;
        let minute = ((self.time >> 5) & 0x3F) as u8;
        let hour = ((self.time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

fn name_len(name: &str) -> io::Result<u16> {
    u16::try_from(name.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("entry name is {} bytes, the limit is 65535", name.len()),
        )
    })
}

/// Local File Header (LFH) - 30 bytes plus the name
pub struct LocalFileHeader<'a> {
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: &'a str,
}

impl LocalFileHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x03\x04";
    pub const SIZE: usize = 30;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let name_len = name_len(self.file_name)?;
        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(self.version_needed)?;
        w.write_u16::<LittleEndian>(self.flags)?;
        w.write_u16::<LittleEndian>(self.compression_method.as_u16())?;
        w.write_u16::<LittleEndian>(self.modified.time)?;
        w.write_u16::<LittleEndian>(self.modified.date)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        w.write_u32::<LittleEndian>(self.compressed_size)?;
        w.write_u32::<LittleEndian>(self.uncompressed_size)?;
        w.write_u16::<LittleEndian>(name_len)?;
        w.write_u16::<LittleEndian>(0)?; // extra field length
        w.write_all(self.file_name.as_bytes())
    }
}

/// Data descriptor trailing a streamed entry - 16 bytes, or 24 with ZIP64 sizes
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

impl DataDescriptor {
    pub const SIGNATURE: &'static [u8] = b"PK\x07\x08";

    pub fn is_zip64(&self) -> bool {
        self.compressed_size >= U32_SENTINEL as u64 || self.uncompressed_size >= U32_SENTINEL as u64
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(Self::SIGNATURE)?;
        w.write_u32::<LittleEndian>(self.crc32)?;
        if self.is_zip64() {
            w.write_u64::<LittleEndian>(self.compressed_size)?;
            w.write_u64::<LittleEndian>(self.uncompressed_size)?;
        } else {
            w.write_u32::<LittleEndian>(self.compressed_size as u32)?;
            w.write_u32::<LittleEndian>(self.uncompressed_size as u32)?;
        }
        Ok(())
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus name and extra field
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub external_attrs: u32,
    pub lfh_offset: u64,
    pub file_name: String,
}

impl CentralDirectoryHeader {
    pub const SIGNATURE: &'static [u8] = b"PK\x01\x02";
    pub const MIN_SIZE: usize = 46;

    /// Whether sizes or offset overflow the 32-bit fields.
    pub fn is_zip64(&self) -> bool {
        self.compressed_size >= U32_SENTINEL as u64
            || self.uncompressed_size >= U32_SENTINEL as u64
            || self.lfh_offset >= U32_SENTINEL as u64
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let name_len = name_len(&self.file_name)?;
        let zip64 = self.is_zip64();

        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(VERSION_MADE_BY)?;
        w.write_u16::<LittleEndian>(if zip64 {
            VERSION_NEEDED_ZIP64
        } else {
            VERSION_NEEDED
        })?;
        w.write_u16::<LittleEndian>(self.flags)?;
        w.write_u16::<LittleEndian>(self.compression_method.as_u16())?;
        w.write_u16::<LittleEndian>(self.modified.time)?;
        w.write_u16::<LittleEndian>(self.modified.date)?;
        w.write_u32::<LittleEndian>(self.crc32)?;

        if zip64 {
            // All three values move into the extra field together
            w.write_u32::<LittleEndian>(U32_SENTINEL)?;
            w.write_u32::<LittleEndian>(U32_SENTINEL)?;
        } else {
            w.write_u32::<LittleEndian>(self.compressed_size as u32)?;
            w.write_u32::<LittleEndian>(self.uncompressed_size as u32)?;
        }

        w.write_u16::<LittleEndian>(name_len)?;
        w.write_u16::<LittleEndian>(if zip64 { 28 } else { 0 })?;
        w.write_u16::<LittleEndian>(0)?; // file comment length
        w.write_u16::<LittleEndian>(0)?; // disk number start
        w.write_u16::<LittleEndian>(0)?; // internal attributes
        w.write_u32::<LittleEndian>(self.external_attrs)?;
        w.write_u32::<LittleEndian>(if zip64 {
            U32_SENTINEL
        } else {
            self.lfh_offset as u32
        })?;
        w.write_all(self.file_name.as_bytes())?;

        if zip64 {
            w.write_u16::<LittleEndian>(ZIP64_EXTRA_ID)?;
            w.write_u16::<LittleEndian>(24)?;
            w.write_u64::<LittleEndian>(self.uncompressed_size)?;
            w.write_u64::<LittleEndian>(self.compressed_size)?;
            w.write_u64::<LittleEndian>(self.lfh_offset)?;
        }
        Ok(())
    }
}

/// End of Central Directory (EOCD) - 22 bytes, written without a comment
pub struct EndOfCentralDirectory {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Whether the ZIP64 record and locator must precede this record.
    pub fn is_zip64(&self) -> bool {
        self.total_entries >= U16_SENTINEL as u64
            || self.cd_size >= U32_SENTINEL as u64
            || self.cd_offset >= U32_SENTINEL as u64
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let entries = u16::try_from(self.total_entries).unwrap_or(U16_SENTINEL);
        let cd_size = clamp_u32(self.cd_size);
        let cd_offset = clamp_u32(self.cd_offset);

        w.write_all(Self::SIGNATURE)?;
        w.write_u16::<LittleEndian>(0)?; // disk number
        w.write_u16::<LittleEndian>(0)?; // disk with central directory
        w.write_u16::<LittleEndian>(entries)?;
        w.write_u16::<LittleEndian>(entries)?;
        w.write_u32::<LittleEndian>(cd_size)?;
        w.write_u32::<LittleEndian>(cd_offset)?;
        w.write_u16::<LittleEndian>(0) // comment length
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(U32_SENTINEL)
}

/// ZIP64 End of Central Directory - 56 bytes
pub struct Zip64EOCD {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const SIZE: usize = 56;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(Self::SIGNATURE)?;
        // Size of the remaining record, excluding signature and this field
        w.write_u64::<LittleEndian>((Self::SIZE - 12) as u64)?;
        w.write_u16::<LittleEndian>(VERSION_MADE_BY)?;
        w.write_u16::<LittleEndian>(VERSION_NEEDED_ZIP64)?;
        w.write_u32::<LittleEndian>(0)?; // disk number
        w.write_u32::<LittleEndian>(0)?; // disk with central directory
        w.write_u64::<LittleEndian>(self.total_entries)?;
        w.write_u64::<LittleEndian>(self.total_entries)?;
        w.write_u64::<LittleEndian>(self.cd_size)?;
        w.write_u64::<LittleEndian>(self.cd_offset)
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes
pub struct Zip64EOCDLocator {
    pub eocd64_offset: u64,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(Self::SIGNATURE)?;
        w.write_u32::<LittleEndian>(0)?; // disk with the ZIP64 EOCD
        w.write_u64::<LittleEndian>(self.eocd64_offset)?;
        w.write_u32::<LittleEndian>(1) // total disks
    }
}
