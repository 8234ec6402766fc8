//! `shelfdex show` - one book in detail

use crate::cli::OutputFormat;
use crate::commands::dispatch::command::CommandContext;
use crate::commands::format::print_json;
use shelfdex_core::db::BookDetail;
use shelfdex_core::error::Result;
use shelfdex_core::format::human_size;

pub fn execute(ctx: &CommandContext, id: i64) -> Result<()> {
    let db = ctx.open_db()?;
    let detail = db.book(id)?;

    match ctx.cli.format {
        OutputFormat::Json => print_json(&detail),
        OutputFormat::Human => {
            print_human(&detail);
            Ok(())
        }
    }
}

fn print_human(detail: &BookDetail) {
    let book = &detail.book;
    println!("{}", book.title);
    for author in &detail.authors {
        println!("  author:   {} (id {})", author.display_name(), author.id);
    }
    if let Some(series) = &book.series {
        println!("  series:   {} #{}", series, book.ser_no.unwrap_or(0));
    }
    for genre in &detail.genres {
        println!("  genre:    {} [{}] (id {})", genre.name, genre.code, genre.id);
    }
    if !detail.keywords.is_empty() {
        println!("  keywords: {}", detail.keywords.join(", "));
    }
    println!("  file:     {}/{}", book.archive, book.file_name);
    println!("  size:     {}", human_size(book.size));
    if !book.lang.is_empty() {
        println!("  language: {}", book.lang);
    }
    if let Some(date) = &book.date_added {
        println!("  added:    {}", date);
    }
}
