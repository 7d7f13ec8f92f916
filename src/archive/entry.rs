use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{BuildError, Result};
use crate::zip::ZipWriter;

use super::header::NormalizedHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { source: PathBuf },
}

/// One record on its way into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Name inside the archive; directory names end in `/`
    pub name: String,
    pub kind: EntryKind,
    pub executable: bool,
}

impl ArchiveEntry {
    pub fn directory(name: String, executable: bool) -> Self {
        let name = if name.ends_with('/') {
            name
        } else {
            name + "/"
        };
        Self {
            name,
            kind: EntryKind::Directory,
            executable,
        }
    }

    pub fn file(name: String, source: PathBuf, executable: bool) -> Self {
        Self {
            name,
            kind: EntryKind::File { source },
            executable,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Path the payload is read from, for file entries.
    pub fn source(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Directory => None,
            EntryKind::File { source } => Some(source),
        }
    }
}

/// Archive name for a filesystem path.
///
/// With `junk_paths` only the final component is kept. Otherwise the path's
/// components are joined with `/`, leaving out any root, drive prefix and
/// `.` components, so `./d/a` and `d/a` name the same entry.
pub fn entry_name(path: &Path, junk_paths: bool) -> String {
    if junk_paths {
        if let Some(base) = path.file_name() {
            return base.to_string_lossy().into_owned();
        }
    }

    let parts: Vec<Cow<'_, str>> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some(Cow::Borrowed("..")),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect();
    parts.join("/")
}

/// Write one entry into the container.
///
/// Directories become empty entries. For files, `source` is opened, streamed
/// through the compressor and closed again before this returns, on success
/// and on failure alike.
pub fn write_entry<W: Write>(
    zip: &mut ZipWriter<W>,
    header: &NormalizedHeader,
    source: Option<&Path>,
) -> Result<()> {
    let write_error = |source: std::io::Error| BuildError::Write {
        name: header.name.clone(),
        source,
    };

    match source {
        None => zip.add_directory(&header.entry_header()).map_err(write_error),
        Some(path) => {
            let file = File::open(path).map_err(|source| BuildError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            zip.add_file(&header.entry_header(), BufReader::new(file))
                .map(|_| ())
                .map_err(write_error)
        }
    }
}
