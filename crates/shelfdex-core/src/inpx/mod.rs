//! INPX library index containers
//!
//! An `.inpx` file is a ZIP archive holding one `.inp` text stream per
//! content archive. Each `.inp` line describes one book.

pub mod parse;
pub mod scanner;

use chrono::NaiveDate;
use serde::Serialize;

pub use parse::{parse_line, FieldSchema};
pub use scanner::{ScanSummary, Scanner};

/// Extension of index containers
pub const INDEX_EXTENSION: &str = "inpx";

/// Extension of index streams inside a container
pub const STREAM_EXTENSION: &str = "inp";

/// Author natural key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct AuthorName {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl AuthorName {
    pub fn new(first: &str, middle: &str, last: &str) -> Self {
        Self {
            first: first.to_string(),
            middle: middle.to_string(),
            last: last.to_string(),
        }
    }

    /// "last first middle", the form used in search documents
    pub fn search_text(&self) -> String {
        [&self.last, &self.first, &self.middle]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Series membership of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRef {
    pub name: String,
    pub number: i64,
}

/// One parsed, not yet persisted book entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Record {
    pub title: String,
    pub authors: Vec<AuthorName>,
    pub genres: Vec<String>,
    pub series: Option<SeriesRef>,
    /// Content file name, extension included
    pub file_name: String,
    /// Content archive path relative to the library root
    pub archive: String,
    pub size: i64,
    pub lib_id: i64,
    pub deleted: bool,
    pub format: String,
    pub date_added: Option<NaiveDate>,
    pub lang: String,
    pub lib_rate: i64,
    pub keywords: Vec<String>,
}

impl Record {
    /// Natural key of the book this record becomes
    pub fn book_key(&self) -> (&str, &str) {
        (&self.archive, &self.file_name)
    }
}
