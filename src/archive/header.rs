use std::fs::Metadata;

use crate::zip::{CompressionMethod, DosDateTime, EntryHeader};

use super::entry::ArchiveEntry;

const S_IFREG: u32 = 0o100000;
const S_IFDIR: u32 = 0o040000;

const MSDOS_READ_ONLY: u32 = 0x01;
const MSDOS_DIRECTORY: u32 = 0x10;

/// The only two permission sets an archive entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionClass {
    /// `r--r--r--`
    ReadOnly,
    /// `r-xr-xr-x`
    ReadExecute,
}

impl PermissionClass {
    pub fn from_executable(executable: bool) -> Self {
        if executable {
            PermissionClass::ReadExecute
        } else {
            PermissionClass::ReadOnly
        }
    }

    /// Permission bits as an octal mode.
    pub fn mode(&self) -> u32 {
        match self {
            PermissionClass::ReadOnly => 0o444,
            PermissionClass::ReadExecute => 0o555,
        }
    }
}

/// Header fields of one archive entry after all host metadata is stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeader {
    pub name: String,
    pub is_directory: bool,
    pub permissions: PermissionClass,
    pub compression_method: CompressionMethod,
    pub modified: DosDateTime,
}

impl NormalizedHeader {
    /// Unix file type and permission bits.
    pub fn unix_mode(&self) -> u32 {
        let file_type = if self.is_directory { S_IFDIR } else { S_IFREG };
        file_type | self.permissions.mode()
    }

    /// Central directory external attributes: Unix mode in the high 16 bits,
    /// MS-DOS attributes in the low byte. No class is writable, so the DOS
    /// read-only bit is always set.
    pub fn external_attrs(&self) -> u32 {
        let mut attrs = (self.unix_mode() << 16) | MSDOS_READ_ONLY;
        if self.is_directory {
            attrs |= MSDOS_DIRECTORY;
        }
        attrs
    }

    pub fn entry_header(&self) -> EntryHeader<'_> {
        EntryHeader {
            name: &self.name,
            compression_method: self.compression_method,
            modified: self.modified,
            external_attrs: self.external_attrs(),
        }
    }
}

/// Derive the canonical header for `entry`.
///
/// Only the name, the entry kind and the executable flag survive; the
/// timestamp is always [`DosDateTime::EPOCH`] and the method always deflate.
pub fn normalize(entry: &ArchiveEntry) -> NormalizedHeader {
    NormalizedHeader {
        name: entry.name.clone(),
        is_directory: entry.is_directory(),
        permissions: PermissionClass::from_executable(entry.executable),
        compression_method: CompressionMethod::Deflate,
        modified: DosDateTime::EPOCH,
    }
}

/// True when any of the owner, group or other execute bits is set.
#[cfg(unix)]
pub fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

/// Hosts without Unix modes have no execute bits to carry over.
#[cfg(not(unix))]
pub fn is_executable(_metadata: &Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, executable: bool) -> ArchiveEntry {
        ArchiveEntry::file(name.to_string(), PathBuf::from(name), executable)
    }

    #[test]
    fn plain_file_is_read_only() {
        let header = normalize(&file("a.txt", false));
        assert_eq!(header.permissions, PermissionClass::ReadOnly);
        assert_eq!(header.unix_mode(), 0o100444);
        assert_eq!(header.external_attrs(), (0o100444 << 16) | 0x01);
    }

    #[test]
    fn executable_file_is_read_execute() {
        let header = normalize(&file("run.sh", true));
        assert_eq!(header.permissions, PermissionClass::ReadExecute);
        assert_eq!(header.unix_mode(), 0o100555);
        assert_eq!(header.external_attrs(), (0o100555 << 16) | 0x01);
    }

    #[test]
    fn directory_carries_dos_directory_bit() {
        let header = normalize(&ArchiveEntry::directory("d".to_string(), true));
        assert_eq!(header.name, "d/");
        assert_eq!(header.unix_mode(), 0o040555);
        assert_eq!(header.external_attrs() & 0x10, 0x10);
    }

    #[test]
    fn everything_else_is_fixed() {
        let header = normalize(&file("a.txt", false));
        assert_eq!(header.compression_method, CompressionMethod::Deflate);
        assert_eq!(header.modified, DosDateTime::EPOCH);
    }

    #[test]
    fn same_executable_state_same_header() {
        assert_eq!(normalize(&file("x", true)), normalize(&file("x", true)));
        assert_ne!(normalize(&file("x", true)), normalize(&file("x", false)));
    }

    #[cfg(unix)]
    #[test]
    fn any_execute_bit_counts() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();

        for (mode, expected) in [
            (0o644, false),
            (0o600, false),
            (0o744, true),
            (0o654, true),
            (0o645, true),
        ] {
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
            let metadata = fs::metadata(&path).unwrap();
            assert_eq!(is_executable(&metadata), expected, "mode {mode:o}");
        }
    }
}
