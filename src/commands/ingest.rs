//! `shelfdex ingest` - scan a library directory into the catalog

use crate::cli::{IngestArgs, OutputFormat};
use crate::commands::dispatch::command::CommandContext;
use crate::commands::format::print_json;
use shelfdex_core::cancel::CancelToken;
use shelfdex_core::error::Result;
use shelfdex_core::ingest::{ingest, IngestReport};

pub fn execute(ctx: &CommandContext, args: &IngestArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    if args.no_bulk {
        config.ingest.bulk = false;
    }
    if let Some(policy) = args.on_batch_error {
        config.ingest.on_batch_error = policy;
    }
    if let Some(size) = args.batch_size {
        config.ingest.batch_size = size;
    }
    config.validate()?;

    let db = ctx.open_db()?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %e, "Could not install interrupt handler");
    }

    let report = ingest(&db, &args.dir, &config.ingest, &cancel)?;

    match ctx.cli.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                print_human(&report);
            }
            Ok(())
        }
    }
}

fn print_human(report: &IngestReport) {
    let scan = &report.scan;
    println!(
        "Ingested {} records from {} container(s), {} stream(s), {} skipped without archive",
        report.records_written, scan.containers, scan.streams, scan.streams_skipped
    );
    println!(
        "  books: {} new, {} updated; batches: {} committed, {} failed",
        report.books_inserted,
        report.books_updated,
        report.batches_committed,
        report.batches_failed
    );
    if scan.malformed + scan.untitled > 0 {
        println!(
            "  ignored lines: {} malformed, {} untitled",
            scan.malformed, scan.untitled
        );
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
}
