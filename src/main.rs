//! Shelfdex - INPX eBook library catalog CLI
//!
//! Ingests `.inpx` library indexes into a SQLite catalog and answers
//! full-text and browse queries against it.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use shelfdex_core::error::{ExitCode as ShelfdexExitCode, ShelfdexError};
use shelfdex_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if wants_json(env::args().skip(1)) => return json_parse_failure(err),
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit(ShelfdexExitCode::Success),
        Err(e) => {
            if cli.format == OutputFormat::Json {
                eprintln!("{}", e.to_json());
            } else if !cli.quiet {
                eprintln!("error: {}", e);
            }
            exit(e.exit_code())
        }
    }
}

fn exit(code: ShelfdexExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}

/// clap fails before `Cli.format` exists, so JSON callers get the envelope here
fn json_parse_failure(err: clap::Error) -> ExitCode {
    let error = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => ShelfdexError::UsageError(err.to_string()),
        _ => ShelfdexError::Other(err.to_string()),
    };
    eprintln!("{}", error.to_json());
    exit(error.exit_code())
}

/// Whether raw argv asks for `--format json` in either spelling
fn wants_json(mut args: impl Iterator<Item = String>) -> bool {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format=json" => return true,
            "--format" if args.next().as_deref() == Some("json") => return true,
            _ => {}
        }
    }
    false
}
