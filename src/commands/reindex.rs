//! `shelfdex reindex` - rebuild the search index

use crate::cli::OutputFormat;
use crate::commands::dispatch::command::CommandContext;
use crate::commands::format::print_json;
use shelfdex_core::error::Result;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let db = ctx.open_db()?;
    let documents = db.rebuild_search_index()?;

    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "documents": documents })),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("Indexed {} books", documents);
            }
            Ok(())
        }
    }
}
