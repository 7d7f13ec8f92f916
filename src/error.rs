use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// Everything that can abort an archive build.
///
/// There is no partial-success mode: the first error stops the build and is
/// reported to the caller as-is.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Fewer than one output and one input were given.
    #[error("not enough arguments provided")]
    Arguments,

    /// The output path exists and overwriting was not requested.
    #[error("file already exists: {}, provide -O for overwrite", .0.display())]
    OutputExists(PathBuf),

    /// The output path is an existing directory.
    #[error("got existing directory as output, it should be a file: {}", .0.display())]
    OutputIsDirectory(PathBuf),

    #[error("failed checking file: {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed opening file: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed walking dir: {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Compressing or storing an entry failed.
    #[error("failed writing content of {name} to zip file: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Writing the central directory failed.
    #[error("failed to close zip file: {0}")]
    Finalize(#[source] io::Error),

    /// Flushing the output file failed.
    #[error("failed to close output file: {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            BuildError::Arguments => 1,
            _ => 2,
        }
    }

    pub(crate) fn walk(source: walkdir::Error) -> Self {
        let path = source.path().map(PathBuf::from).unwrap_or_default();
        BuildError::Walk { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(BuildError::Arguments.exit_code(), 1);
        assert_eq!(BuildError::OutputExists(PathBuf::from("out.zip")).exit_code(), 2);
        let err = BuildError::Finalize(io::Error::other("disk full"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn messages_name_the_path() {
        let err = BuildError::OutputExists(PathBuf::from("out.zip"));
        assert_eq!(
            err.to_string(),
            "file already exists: out.zip, provide -O for overwrite"
        );
    }
}
