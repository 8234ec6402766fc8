//! `shelfdex search` - ranked full-text search

use crate::cli::{OutputFormat, SearchArgs};
use crate::commands::dispatch::command::CommandContext;
use crate::commands::dispatch::trace_command;
use crate::commands::format::{book_line, print_json};
use shelfdex_core::db::SearchQuery;
use shelfdex_core::error::Result;

pub fn execute(ctx: &CommandContext, args: &SearchArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let db = ctx.open_db()?;

    let query = SearchQuery {
        text: args.query.clone(),
        fields: args.fields.clone(),
        languages: args.langs.iter().map(|l| l.to_lowercase()).collect(),
        limit: args.limit.unwrap_or(config.search.default_limit),
        offset: args.offset,
    };
    let results = db.search(&query, &config.search.default_language)?;
    trace_command!(ctx.cli, ctx.start, "search");

    match ctx.cli.format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Human => {
            if results.is_empty() && !ctx.cli.quiet {
                println!("No results");
            }
            for book in &results {
                println!("{}", book_line(book));
            }
            Ok(())
        }
    }
}
