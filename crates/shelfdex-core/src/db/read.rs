//! Read accessors for the presentation layer
//!
//! Every query here filters on `books.deleted = 0`; an entity whose books
//! are all soft-deleted is invisible.

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{fold, Database};
use crate::error::{Result, ShelfdexError};
use crate::map_db_err;

/// Book columns plus first series and presentation strings, in
/// `summary_from_row` order
pub(crate) const SUMMARY_COLUMNS: &str = "b.id, b.title, b.lang, b.archive, b.file_name, b.format, \
     b.size, b.date_added, b.lib_id, b.lib_rate, s.name, bs.ser_no, \
     COALESCE((SELECT group_concat(trim(a.last_name || ' ' || a.first_name || ' ' || a.middle_name), ', ') \
       FROM book_authors ba JOIN authors a ON a.id = ba.author_id WHERE ba.book_id = b.id), '') AS authors, \
     COALESCE((SELECT group_concat(g.name, ', ') \
       FROM book_genres bg JOIN genres g ON g.id = bg.genre_id WHERE bg.book_id = b.id), '') AS genres";

pub(crate) const SUMMARY_JOINS: &str =
    "LEFT JOIN book_series bs ON bs.book_id = b.id LEFT JOIN series s ON s.id = bs.series_id";

const BOOK_ORDER: &str = "ORDER BY s.name COLLATE NOCASE, bs.ser_no, b.title COLLATE NOCASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub lang: String,
    pub archive: String,
    pub file_name: String,
    pub format: String,
    pub size: i64,
    pub date_added: Option<String>,
    pub lib_id: i64,
    pub lib_rate: i64,
    pub series: Option<String>,
    pub ser_no: Option<i64>,
    /// Author display names, comma separated
    pub authors: String,
    /// Genre display names, comma separated
    pub genres: String,
}

pub(crate) fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<BookSummary> {
    Ok(BookSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        lang: row.get(2)?,
        archive: row.get(3)?,
        file_name: row.get(4)?,
        format: row.get(5)?,
        size: row.get(6)?,
        date_added: row.get(7)?,
        lib_id: row.get(8)?,
        lib_rate: row.get(9)?,
        series: row.get(10)?,
        ser_no: row.get(11)?,
        authors: row.get(12)?,
        genres: row.get(13)?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetail {
    pub book: BookSummary,
    pub authors: Vec<AuthorEntry>,
    pub genres: Vec<GenreEntry>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Visible books
    pub books: i64,
}

impl AuthorEntry {
    /// "last first middle", skipping empty parts
    pub fn display_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            middle_name: row.get(2)?,
            last_name: row.get(3)?,
            books: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreEntry {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub translit: String,
    pub books: i64,
}

impl GenreEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            translit: row.get(3)?,
            books: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesEntry {
    pub id: i64,
    pub name: String,
    pub books: i64,
}

/// First letter of a name and how many visible entities start with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterEntry {
    pub letter: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub books: i64,
    pub authors: i64,
    pub genres: i64,
    pub series: i64,
    pub keywords: i64,
}

const AUTHOR_SELECT: &str = "SELECT a.id, a.first_name, a.middle_name, a.last_name, COUNT(b.id)
     FROM authors a
     JOIN book_authors ba ON ba.author_id = a.id
     JOIN books b ON b.id = ba.book_id AND b.deleted = 0";

const GENRE_SELECT: &str = "SELECT g.id, g.code, g.name, g.translit, COUNT(b.id)
     FROM genres g
     JOIN book_genres bg ON bg.genre_id = g.id
     JOIN books b ON b.id = bg.book_id AND b.deleted = 0";

const SERIES_SELECT: &str = "SELECT s.id, s.name, COUNT(b.id)
     FROM series s
     JOIN book_series bs ON bs.series_id = s.id
     JOIN books b ON b.id = bs.book_id AND b.deleted = 0";

/// Character length and case-folded form of a listing prefix
fn folded_prefix(prefix: &str) -> Result<(i64, String)> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        crate::bail_invalid!("prefix", "(empty)");
    }
    Ok((prefix.chars().count() as i64, fold::fold_case(prefix)))
}

/// Fold per-first-character counts case-insensitively
fn fold_letters(rows: Vec<(String, i64)>) -> Vec<LetterEntry> {
    let mut letters: BTreeMap<String, i64> = BTreeMap::new();
    for (letter, count) in rows {
        *letters.entry(letter.to_uppercase()).or_default() += count;
    }
    letters
        .into_iter()
        .map(|(letter, count)| LetterEntry { letter, count })
        .collect()
}

fn not_found_if_empty<T>(items: Vec<T>, entity: &str, id: i64) -> Result<Vec<T>> {
    if items.is_empty() {
        Err(ShelfdexError::not_found(entity, id))
    } else {
        Ok(items)
    }
}

impl Database {
    fn book_list(&self, filter: &str, id: i64) -> Result<Vec<BookSummary>> {
        let sql = format!(
            "SELECT {} FROM books b {} WHERE b.deleted = 0 AND {} {}",
            SUMMARY_COLUMNS, SUMMARY_JOINS, filter, BOOK_ORDER
        );
        let mut stmt = self
            .conn()
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare book list", e))?;
        let books = stmt
            .query_map([id], summary_from_row)
            .map_err(|e| map_db_err!("list books", e))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    pub fn book(&self, id: i64) -> Result<BookDetail> {
        let sql = format!(
            "SELECT {} FROM books b {} WHERE b.id = ?1 AND b.deleted = 0",
            SUMMARY_COLUMNS, SUMMARY_JOINS
        );
        let book = self
            .conn()
            .query_row(&sql, [id], summary_from_row)
            .optional()
            .map_err(|e| map_db_err!("get book", e))?
            .ok_or_else(|| ShelfdexError::not_found("book", id))?;

        let authors = self.collect(
            &format!(
                "{} WHERE a.id IN (SELECT author_id FROM book_authors WHERE book_id = ?1)
                 GROUP BY a.id ORDER BY a.last_name COLLATE NOCASE, a.first_name COLLATE NOCASE",
                AUTHOR_SELECT
            ),
            params![id],
            AuthorEntry::from_row,
        )?;
        let genres = self.collect(
            &format!(
                "{} WHERE g.id IN (SELECT genre_id FROM book_genres WHERE book_id = ?1)
                 GROUP BY g.id ORDER BY g.name COLLATE NOCASE",
                GENRE_SELECT
            ),
            params![id],
            GenreEntry::from_row,
        )?;
        let keywords = self.collect(
            "SELECT k.name FROM book_keywords bk JOIN keywords k ON k.id = bk.keyword_id
             WHERE bk.book_id = ?1 ORDER BY k.name",
            params![id],
            |row| row.get(0),
        )?;

        Ok(BookDetail {
            book,
            authors,
            genres,
            keywords,
        })
    }

    fn collect<T, F>(&self, sql: &str, params: impl rusqlite::Params, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self
            .conn()
            .prepare(sql)
            .map_err(|e| map_db_err!("prepare listing", e))?;
        let items = stmt
            .query_map(params, map)
            .map_err(|e| map_db_err!("run listing", e))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn single<T, F>(&self, sql: &str, id: i64, entity: &str, map: F) -> Result<T>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.conn()
            .query_row(sql, [id], map)
            .optional()
            .map_err(|e| map_db_err!(&format!("get {}", entity), e))?
            .ok_or_else(|| ShelfdexError::not_found(entity, id))
    }

    pub fn author(&self, id: i64) -> Result<AuthorEntry> {
        let sql = format!("{} WHERE a.id = ?1 GROUP BY a.id", AUTHOR_SELECT);
        self.single(&sql, id, "author", AuthorEntry::from_row)
    }

    pub fn genre(&self, id: i64) -> Result<GenreEntry> {
        let sql = format!("{} WHERE g.id = ?1 GROUP BY g.id", GENRE_SELECT);
        self.single(&sql, id, "genre", GenreEntry::from_row)
    }

    pub fn series_by_id(&self, id: i64) -> Result<SeriesEntry> {
        let sql = format!("{} WHERE s.id = ?1 GROUP BY s.id", SERIES_SELECT);
        self.single(&sql, id, "series", |row| {
            Ok(SeriesEntry {
                id: row.get(0)?,
                name: row.get(1)?,
                books: row.get(2)?,
            })
        })
    }

    /// Authors with visible books, optionally restricted to a last-name prefix
    pub fn authors(&self, prefix: Option<&str>) -> Result<Vec<AuthorEntry>> {
        let order = "GROUP BY a.id ORDER BY a.last_name COLLATE NOCASE, \
                     a.first_name COLLATE NOCASE, a.middle_name COLLATE NOCASE";
        match prefix {
            None => {
                let sql = format!("{} {}", AUTHOR_SELECT, order);
                self.collect(&sql, [], AuthorEntry::from_row)
            }
            Some(prefix) => {
                let (len, folded) = folded_prefix(prefix)?;
                let sql = format!(
                    "{} WHERE fold_case(substr(a.last_name, 1, ?1)) = ?2 {}",
                    AUTHOR_SELECT, order
                );
                self.collect(&sql, params![len, folded], AuthorEntry::from_row)
            }
        }
    }

    /// Series with visible books, optionally restricted to a name prefix
    pub fn series_list(&self, prefix: Option<&str>) -> Result<Vec<SeriesEntry>> {
        let map = |row: &Row<'_>| {
            Ok(SeriesEntry {
                id: row.get(0)?,
                name: row.get(1)?,
                books: row.get(2)?,
            })
        };
        let order = "GROUP BY s.id ORDER BY s.name COLLATE NOCASE";
        match prefix {
            None => self.collect(&format!("{} {}", SERIES_SELECT, order), [], map),
            Some(prefix) => {
                let (len, folded) = folded_prefix(prefix)?;
                let sql = format!(
                    "{} WHERE fold_case(substr(s.name, 1, ?1)) = ?2 {}",
                    SERIES_SELECT, order
                );
                self.collect(&sql, params![len, folded], map)
            }
        }
    }

    /// First letters of visible authors' last names
    pub fn author_letters(&self) -> Result<Vec<LetterEntry>> {
        let rows = self.collect(
            "SELECT substr(a.last_name, 1, 1) AS letter, COUNT(DISTINCT a.id)
             FROM authors a
             JOIN book_authors ba ON ba.author_id = a.id
             JOIN books b ON b.id = ba.book_id AND b.deleted = 0
             WHERE a.last_name <> '' GROUP BY letter",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(fold_letters(rows))
    }

    /// First letters of visible series names
    pub fn series_letters(&self) -> Result<Vec<LetterEntry>> {
        let rows = self.collect(
            "SELECT substr(s.name, 1, 1) AS letter, COUNT(DISTINCT s.id)
             FROM series s
             JOIN book_series bs ON bs.series_id = s.id
             JOIN books b ON b.id = bs.book_id AND b.deleted = 0
             WHERE s.name <> '' GROUP BY letter",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(fold_letters(rows))
    }

    pub fn genres(&self) -> Result<Vec<GenreEntry>> {
        self.collect(
            &format!("{} GROUP BY g.id ORDER BY g.name COLLATE NOCASE", GENRE_SELECT),
            [],
            GenreEntry::from_row,
        )
    }

    pub fn books_by_author(&self, author_id: i64) -> Result<Vec<BookSummary>> {
        let books = self.book_list(
            "b.id IN (SELECT book_id FROM book_authors WHERE author_id = ?1)",
            author_id,
        )?;
        not_found_if_empty(books, "author", author_id)
    }

    pub fn books_by_genre(&self, genre_id: i64) -> Result<Vec<BookSummary>> {
        let books = self.book_list(
            "b.id IN (SELECT book_id FROM book_genres WHERE genre_id = ?1)",
            genre_id,
        )?;
        not_found_if_empty(books, "genre", genre_id)
    }

    pub fn books_by_series(&self, series_id: i64) -> Result<Vec<BookSummary>> {
        let books = self.book_list("bs.series_id = ?1", series_id)?;
        not_found_if_empty(books, "series", series_id)
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        let count = |sql: &str| -> Result<i64> {
            self.conn()
                .query_row(sql, [], |row| row.get(0))
                .map_err(|e| map_db_err!("count catalog", e))
        };
        let linked = |table: &str, column: &str| {
            count(&format!(
                "SELECT COUNT(DISTINCT x.{}) FROM {} x JOIN books b ON b.id = x.book_id AND b.deleted = 0",
                column, table
            ))
        };

        Ok(CatalogStats {
            books: count("SELECT COUNT(*) FROM books WHERE deleted = 0")?,
            authors: linked("book_authors", "author_id")?,
            genres: linked("book_genres", "genre_id")?,
            series: linked("book_series", "series_id")?,
            keywords: linked("book_keywords", "keyword_id")?,
        })
    }
}
