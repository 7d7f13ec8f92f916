use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{BuildError, Result};

use super::BuildOptions;
use super::entry::{ArchiveEntry, entry_name};
use super::header::is_executable;

/// Depth-first enumeration of a directory tree.
///
/// Children of every directory are visited in byte-wise order of their file
/// names, and a directory is yielded before its contents. The walk is lazy
/// and single-pass; walking again touches the filesystem again.
///
/// Symbolic links are not descended into. A link met inside the tree is
/// archived as the file it points to, whose metadata decides the permission
/// class.
pub struct TreeWalker {
    inner: walkdir::IntoIter,
    junk_paths: bool,
}

/// Walk `dir`, yielding one [`ArchiveEntry`] per directory and file.
///
/// With [`BuildOptions::junk_paths`] directories are skipped entirely and
/// files are named by their base name alone.
pub fn walk(dir: &Path, options: &BuildOptions) -> TreeWalker {
    TreeWalker {
        inner: WalkDir::new(dir).sort_by_file_name().into_iter(),
        junk_paths: options.junk_paths,
    }
}

impl TreeWalker {
    fn entry(&self, dent: walkdir::DirEntry) -> Result<Option<ArchiveEntry>> {
        let path = dent.path();

        if dent.file_type().is_dir() {
            if self.junk_paths {
                return Ok(None);
            }
            let name = entry_name(path, false);
            // `.` as an input has no name of its own, only its children do
            if name.is_empty() {
                return Ok(None);
            }
            let metadata = dent.metadata().map_err(BuildError::walk)?;
            return Ok(Some(ArchiveEntry::directory(name, is_executable(&metadata))));
        }

        let metadata = fs::metadata(path).map_err(|source| BuildError::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(ArchiveEntry::file(
            entry_name(path, self.junk_paths),
            path.to_path_buf(),
            is_executable(&metadata),
        )))
    }
}

impl Iterator for TreeWalker {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dent = match self.inner.next()? {
                Ok(dent) => dent,
                Err(err) => return Some(Err(BuildError::walk(err))),
            };
            match self.entry(dent) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
