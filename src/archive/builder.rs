use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{BuildError, Result};
use crate::zip::ZipWriter;

use super::BuildOptions;
use super::entry::{ArchiveEntry, entry_name, write_entry};
use super::header::{is_executable, normalize};
use super::walker::walk;

/// Entry counts of a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files: usize,
    pub directories: usize,
}

/// Builds reproducible ZIP archives from files and directory trees.
///
/// Inputs are sorted by their raw path string before anything is read, so
/// the order they were given in never shows up in the output. Each entry
/// added is announced on stdout as `  adding: <name>`, in write order.
pub struct ArchiveBuilder {
    options: BuildOptions,
}

impl ArchiveBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the archive into the file at `output`.
    ///
    /// `output` must not exist unless [`BuildOptions::overwrite`] is set, and
    /// may never be a directory. On failure the partial archive is left on
    /// disk, finalized and closed.
    pub fn build<P: AsRef<Path>>(&self, output: &Path, inputs: &[P]) -> Result<BuildSummary> {
        self.check_output(output)?;

        let file = File::create(output).map_err(|source| BuildError::Open {
            path: output.to_path_buf(),
            source,
        })?;
        let (writer, summary) = self.build_to(BufWriter::new(file), inputs)?;
        writer.into_inner().map_err(|err| BuildError::Close {
            path: output.to_path_buf(),
            source: err.into_error(),
        })?;

        Ok(summary)
    }

    /// Build the archive into any writer and return it once finalized.
    pub fn build_to<W: Write, P: AsRef<Path>>(
        &self,
        writer: W,
        inputs: &[P],
    ) -> Result<(W, BuildSummary)> {
        let mut inputs: Vec<&Path> = inputs.iter().map(AsRef::as_ref).collect();
        inputs.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        let mut zip = ZipWriter::new(writer);
        let mut session = Session::default();

        for input in inputs {
            let metadata = fs::metadata(input).map_err(|source| BuildError::Stat {
                path: input.to_path_buf(),
                source,
            })?;

            if metadata.is_dir() {
                debug!(input = %input.display(), "walking directory");
                for entry in walk(input, &self.options) {
                    session.add(&mut zip, &entry?)?;
                }
            } else {
                debug!(input = %input.display(), "adding file");
                let entry = ArchiveEntry::file(
                    entry_name(input, self.options.junk_paths),
                    input.to_path_buf(),
                    is_executable(&metadata),
                );
                session.add(&mut zip, &entry)?;
            }
        }

        let writer = zip.finish().map_err(BuildError::Finalize)?;
        let summary = session.summary;
        info!(
            files = summary.files,
            directories = summary.directories,
            "archive finalized"
        );
        Ok((writer, summary))
    }

    fn check_output(&self, output: &Path) -> Result<()> {
        match fs::metadata(output) {
            Ok(metadata) => {
                if !self.options.overwrite {
                    return Err(BuildError::OutputExists(output.to_path_buf()));
                }
                if metadata.is_dir() {
                    return Err(BuildError::OutputIsDirectory(output.to_path_buf()));
                }
                debug!(output = %output.display(), "overwriting existing file");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(BuildError::Stat {
                path: output.to_path_buf(),
                source,
            }),
        }
    }
}

/// Per-build bookkeeping.
#[derive(Default)]
struct Session {
    names: HashSet<String>,
    summary: BuildSummary,
}

impl Session {
    fn add<W: Write>(&mut self, zip: &mut ZipWriter<W>, entry: &ArchiveEntry) -> Result<()> {
        let header = normalize(entry);

        // Duplicates are written as-is; readers decide which copy wins
        if !self.names.insert(header.name.clone()) {
            warn!(name = %header.name, "duplicate entry name in archive");
        }

        announce(&header.name);
        write_entry(zip, &header, entry.source())?;

        if header.is_directory {
            self.summary.directories += 1;
        } else {
            self.summary.files += 1;
        }
        Ok(())
    }
}

/// Print the `adding:` line for an entry.
///
/// A closed or broken stdout must not stop the archive from being written,
/// so write errors are dropped.
fn announce(name: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "  adding: {name}");
}
