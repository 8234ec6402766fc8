//! CLI argument parsing for shelfdex
//!
//! Global flags: --db, --config, --format, --quiet, --verbose

pub mod args;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{BooksArgs, IngestArgs, ListArgs, SearchArgs};
pub use shelfdex_core::format::OutputFormat;

/// Shelfdex - catalog and search INPX eBook library indexes
#[derive(Parser, Debug)]
#[command(name = "shelfdex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Catalog database file
    #[arg(long, global = true, env = "SHELFDEX_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: shelfdex.toml next to the database)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_parser = parse::parse_output_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging and phase timing
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `shelfdex_core=trace` (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest every .inpx container under a library directory
    Ingest(IngestArgs),

    /// Full-text search over titles, authors, series and genres
    Search(SearchArgs),

    /// Rebuild the search index from the catalog
    Reindex,

    /// Show one book
    Show {
        /// Book ID
        id: i64,
    },

    /// List authors, optionally by last-name prefix
    Authors(ListArgs),

    /// List series, optionally by name prefix
    Series(ListArgs),

    /// List genres
    Genres,

    /// List the books of an author, genre or series
    Books(BooksArgs),

    /// Catalog counts
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "shelfdex", "search", "asimov", "--field", "author", "--field", "title", "--lang", "ru",
        ])
        .unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.fields.len(), 2);
        assert_eq!(args.langs, vec!["ru"]);
    }

    #[test]
    fn test_books_requires_exactly_one_filter() {
        assert!(Cli::try_parse_from(["shelfdex", "books"]).is_err());
        let both = ["shelfdex", "books", "--author", "1", "--genre", "2"];
        assert!(Cli::try_parse_from(both).is_err());
        assert!(Cli::try_parse_from(["shelfdex", "books", "--series", "3"]).is_ok());
    }
}
