//! Argument structs for subcommands

use std::path::PathBuf;

use clap::Args;
use shelfdex_core::config::BatchErrorPolicy;
use shelfdex_core::db::SearchField;

use super::parse::{parse_batch_policy, parse_search_field};

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Library root directory
    pub dir: PathBuf,

    /// Keep indexes and incremental search maintenance during the scan
    #[arg(long)]
    pub no_bulk: bool,

    /// continue, abort or retry-then-continue
    #[arg(long, value_parser = parse_batch_policy)]
    pub on_batch_error: Option<BatchErrorPolicy>,

    /// Records per committed batch
    #[arg(long)]
    pub batch_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search text
    pub query: String,

    /// Restrict to a field (title, author, series, genre); repeatable
    #[arg(long = "field", value_parser = parse_search_field)]
    pub fields: Vec<SearchField>,

    /// Restrict to a language code; repeatable
    #[arg(long = "lang")]
    pub langs: Vec<String>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Name prefix
    #[arg(long, conflicts_with = "letters")]
    pub prefix: Option<String>,

    /// List first letters with counts instead of names
    #[arg(long)]
    pub letters: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct BooksArgs {
    /// Author ID
    #[arg(long)]
    pub author: Option<i64>,

    /// Genre ID
    #[arg(long)]
    pub genre: Option<i64>,

    /// Series ID
    #[arg(long)]
    pub series: Option<i64>,
}
