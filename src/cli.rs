use clap::Parser;
use std::path::PathBuf;

use crate::archive::BuildOptions;

// Flags are accepted anywhere on the command line (`dzip out.zip -j d`
// junks paths); everything after `--` is positional.
#[derive(Parser, Debug)]
#[command(name = "dzip")]
#[command(version)]
#[command(about = "Create zip files with reproducible content", long_about = None)]
#[command(after_help = "dzip creates zip file called <OUTPUT> from all provided <INPUTS>\n\
while stripping down some meta information (like modification time\n\
and permissions on files) in order to make deterministic output.\n\n\
Examples:\n  \
  dzip out.zip src README.md     archive a directory tree and a file\n  \
  dzip -j -O flat.zip assets     flat archive, replacing flat.zip if present")]
pub struct Cli {
    /// Zip file to create
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Files and directories to add
    #[arg(value_name = "INPUTS", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Junk (don't record) directory names
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Overwrite (if exists) output file
    #[arg(short = 'O')]
    pub overwrite: bool,

    /// Log progress details to stderr
    #[arg(short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            junk_paths: self.junk_paths,
            overwrite: self.overwrite,
        }
    }
}
