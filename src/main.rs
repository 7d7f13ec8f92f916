//! Main entry point for the dzip CLI application.
//!
//! Exit codes: 0 on success, 1 when arguments are missing, 2 when the build
//! fails. Messages for the user go to stdout; diagnostics go to stderr.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::Level;

use dzip::{ArchiveBuilder, BuildError, Cli};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::MissingRequiredArgument => {
            let err = BuildError::Arguments;
            say(format_args!("{err}\n{}", Cli::command().render_help()));
            return ExitCode::from(err.exit_code());
        }
        // --help, --version and malformed flags are reported by clap itself
        Err(err) => err.exit(),
    };

    init_logging(cli.verbose);

    let builder = ArchiveBuilder::new(cli.options());
    match builder.build(&cli.output, &cli.inputs) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            say(format_args!("failed creating zip: {err}"));
            ExitCode::from(err.exit_code())
        }
    }
}

/// Print a line for the user on stdout. A closed stdout is not an error
/// worth dying over, so failures are ignored.
fn say(message: fmt::Arguments<'_>) {
    let _ = writeln!(io::stdout().lock(), "{message}");
}

/// Send tracing output to stderr, keeping stdout for the `adding:` lines.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
