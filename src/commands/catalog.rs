//! Browse commands: authors, series, genres, books, stats

use crate::cli::{BooksArgs, ListArgs, OutputFormat};
use crate::commands::dispatch::command::CommandContext;
use crate::commands::format::{book_line, print_json};
use shelfdex_core::db::LetterEntry;
use shelfdex_core::error::{Result, ShelfdexError};

fn print_letters(ctx: &CommandContext, letters: &[LetterEntry]) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Json => print_json(letters),
        OutputFormat::Human => {
            for entry in letters {
                println!("{}  {}", entry.letter, entry.count);
            }
            Ok(())
        }
    }
}

pub fn authors(ctx: &CommandContext, args: &ListArgs) -> Result<()> {
    let db = ctx.open_db()?;
    if args.letters {
        return print_letters(ctx, &db.author_letters()?);
    }

    let authors = db.authors(args.prefix.as_deref())?;
    match ctx.cli.format {
        OutputFormat::Json => print_json(&authors),
        OutputFormat::Human => {
            for author in &authors {
                println!("{:>8}  {} ({})", author.id, author.display_name(), author.books);
            }
            Ok(())
        }
    }
}

pub fn series(ctx: &CommandContext, args: &ListArgs) -> Result<()> {
    let db = ctx.open_db()?;
    if args.letters {
        return print_letters(ctx, &db.series_letters()?);
    }

    let series = db.series_list(args.prefix.as_deref())?;
    match ctx.cli.format {
        OutputFormat::Json => print_json(&series),
        OutputFormat::Human => {
            for entry in &series {
                println!("{:>8}  {} ({})", entry.id, entry.name, entry.books);
            }
            Ok(())
        }
    }
}

pub fn genres(ctx: &CommandContext) -> Result<()> {
    let db = ctx.open_db()?;
    let genres = db.genres()?;
    match ctx.cli.format {
        OutputFormat::Json => print_json(&genres),
        OutputFormat::Human => {
            for genre in &genres {
                println!("{:>8}  {} [{}] ({})", genre.id, genre.name, genre.code, genre.books);
            }
            Ok(())
        }
    }
}

pub fn books(ctx: &CommandContext, args: &BooksArgs) -> Result<()> {
    let db = ctx.open_db()?;
    let books = match (args.author, args.genre, args.series) {
        (Some(id), _, _) => db.books_by_author(id)?,
        (_, Some(id), _) => db.books_by_genre(id)?,
        (_, _, Some(id)) => db.books_by_series(id)?,
        _ => {
            return Err(ShelfdexError::UsageError(
                "one of --author, --genre or --series is required".to_string(),
            ))
        }
    };

    match ctx.cli.format {
        OutputFormat::Json => print_json(&books),
        OutputFormat::Human => {
            for book in &books {
                println!("{}", book_line(book));
            }
            Ok(())
        }
    }
}

pub fn stats(ctx: &CommandContext) -> Result<()> {
    let db = ctx.open_db()?;
    let stats = db.stats()?;
    let mode = db.search_index_mode()?;
    match ctx.cli.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "stats": stats,
            "search_index": mode,
        })),
        OutputFormat::Human => {
            println!("books:    {}", stats.books);
            println!("authors:  {}", stats.authors);
            println!("genres:   {}", stats.genres);
            println!("series:   {}", stats.series);
            println!("keywords: {}", stats.keywords);
            println!("index:    {}", mode.as_str());
            Ok(())
        }
    }
}
