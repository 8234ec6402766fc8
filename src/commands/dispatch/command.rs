//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Cli;
use shelfdex_core::config::LibraryConfig;
use shelfdex_core::db::{Database, DB_FILE};
use shelfdex_core::error::Result;

use super::trace_command;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    /// `--db`, then `SHELFDEX_DB`, then `shelfdex.db` in the working directory
    pub fn db_path(&self) -> PathBuf {
        self.cli
            .db
            .clone()
            .unwrap_or_else(|| PathBuf::from(DB_FILE))
    }

    pub fn open_db(&self) -> Result<Database> {
        let db = Database::open(&self.db_path())?;
        trace_command!(self.cli, self.start, "open_db");
        Ok(db)
    }

    /// `--config` if given, otherwise `shelfdex.toml` beside the database
    pub fn load_config(&self) -> Result<LibraryConfig> {
        match &self.cli.config {
            Some(path) => LibraryConfig::load(path),
            None => {
                let db_path = self.db_path();
                let dir = db_path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                LibraryConfig::load_or_default(dir)
            }
        }
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("shelfdex {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Catalog and search INPX eBook library indexes.");
        println!();
        println!("Run `shelfdex --help` for usage information.");
        Ok(())
    }
}
