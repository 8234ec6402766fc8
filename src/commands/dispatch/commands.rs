//! Routing from parsed subcommands to their implementations

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{catalog, ingest, reindex, search, show};
use shelfdex_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Ingest(args) => ingest::execute(ctx, args),
            Commands::Search(args) => search::execute(ctx, args),
            Commands::Reindex => reindex::execute(ctx),
            Commands::Show { id } => show::execute(ctx, *id),
            Commands::Authors(args) => catalog::authors(ctx, args),
            Commands::Series(args) => catalog::series(ctx, args),
            Commands::Genres => catalog::genres(ctx),
            Commands::Books(args) => catalog::books(ctx, args),
            Commands::Stats => catalog::stats(ctx),
        }
    }
}
