//! Batch persistence writer
//!
//! Each batch is written in one transaction: books first (chunked multi-row
//! inserts), then entity resolution through the identity caches, then the
//! link tables. Any failure rolls the whole batch back.

use std::collections::HashMap;
use std::time::Instant;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ToSql};

use super::{Database, EntityCaches};
use crate::config::{IdAssignment, IngestConfig};
use crate::error::{Result, ShelfdexError};
use crate::inpx::Record;
use crate::{map_db_err, trace_time};

/// Bound parameters per book row
pub const BOOK_COLUMNS: usize = 10;

const BOOK_INSERT: &str = "INSERT INTO books \
    (title, lang, archive, file_name, format, size, date_added, lib_id, lib_rate, deleted) VALUES ";

const LINK_TABLES: [&str; 4] = ["book_authors", "book_genres", "book_series", "book_keywords"];

#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub max_params: usize,
    pub id_assignment: IdAssignment,
}

impl From<&IngestConfig> for WriterOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            max_params: config.max_params,
            id_assignment: config.id_assignment,
        }
    }
}

/// What one committed batch did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub updated: usize,
    /// Records collapsed because another record in the batch had the same file
    pub duplicates: usize,
}

pub struct BatchWriter<'a> {
    db: &'a Database,
    caches: &'a EntityCaches,
    options: WriterOptions,
}

impl<'a> BatchWriter<'a> {
    pub fn new(db: &'a Database, caches: &'a EntityCaches, options: WriterOptions) -> Self {
        Self {
            db,
            caches,
            options,
        }
    }

    /// Rows that fit in one statement without exceeding the parameter ceiling
    pub fn rows_per_chunk(&self, columns: usize) -> usize {
        (self.options.max_params / columns).max(1)
    }

    /// Write `records` atomically
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn write_batch(&self, records: &[Record]) -> Result<BatchOutcome> {
        let start = Instant::now();
        let tx = self
            .db
            .conn()
            .unchecked_transaction()
            .map_err(|e| ShelfdexError::transaction("start", e))?;

        let result = self.write_in(&tx, records).and_then(|outcome| {
            tx.commit()
                .map_err(|e| ShelfdexError::transaction("commit", e))?;
            Ok(outcome)
        });

        match result {
            Ok(outcome) => {
                self.caches.commit_staged();
                trace_time!(start, "write_batch", inserted = outcome.inserted);
                Ok(outcome)
            }
            Err(e) => {
                self.caches.rollback_staged();
                Err(e)
            }
        }
    }

    fn write_in(&self, conn: &Connection, records: &[Record]) -> Result<BatchOutcome> {
        let unique = dedupe(records);
        let mut outcome = BatchOutcome {
            duplicates: records.len() - unique.len(),
            ..BatchOutcome::default()
        };

        let existing = self.lookup_existing(conn, &unique)?;
        let mut books: Vec<(i64, &Record)> = Vec::with_capacity(unique.len());
        let mut fresh: Vec<&Record> = Vec::new();
        for record in unique {
            match existing.get(&(record.archive.clone(), record.file_name.clone())) {
                Some(id) => books.push((*id, record)),
                None => fresh.push(record),
            }
        }

        outcome.updated = books.len();
        self.update_books(conn, &books)?;

        let ids = self.insert_books(conn, &fresh)?;
        outcome.inserted = ids.len();
        books.extend(ids.into_iter().zip(fresh));

        self.link_entities(conn, &books)?;
        Ok(outcome)
    }

    /// IDs of books in this batch that are already stored
    fn lookup_existing(
        &self,
        conn: &Connection,
        records: &[&Record],
    ) -> Result<HashMap<(String, String), i64>> {
        let mut existing = HashMap::new();
        for chunk in records.chunks(self.rows_per_chunk(2)) {
            let sql = format!(
                "SELECT id, archive, file_name FROM books WHERE (archive, file_name) IN (VALUES {})",
                placeholders(2, chunk.len())
            );
            let keys = chunk
                .iter()
                .flat_map(|r| [r.archive.as_str(), r.file_name.as_str()]);
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| map_db_err!("prepare book lookup", e))?;
            let rows = stmt
                .query_map(params_from_iter(keys), |row| {
                    Ok(((row.get(1)?, row.get(2)?), row.get(0)?))
                })?
                .collect::<rusqlite::Result<Vec<((String, String), i64)>>>()?;
            existing.extend(rows);
        }
        Ok(existing)
    }

    /// Insert new books, returning their IDs in input order
    fn insert_books(&self, conn: &Connection, books: &[&Record]) -> Result<Vec<i64>> {
        match self.options.id_assignment {
            IdAssignment::Contiguous => self.insert_books_contiguous(conn, books),
            IdAssignment::ReadBack => insert_books_read_back(conn, books),
        }
    }

    /// One multi-row INSERT per chunk.
    ///
    /// SQLite assigns `max(rowid) + 1, + 2, ...` to the rows of a single
    /// statement on an `INTEGER PRIMARY KEY` table while the write lock is
    /// held, so the chunk's IDs end at `last_insert_rowid()`.
    fn insert_books_contiguous(&self, conn: &Connection, books: &[&Record]) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(books.len());
        for chunk in books.chunks(self.rows_per_chunk(BOOK_COLUMNS)) {
            let sql = format!("{}{}", BOOK_INSERT, placeholders(BOOK_COLUMNS, chunk.len()));
            let values: Vec<[Value; BOOK_COLUMNS]> = chunk.iter().map(|r| book_values(r)).collect();
            conn.execute(&sql, params_from_iter(values.iter().flatten()))
                .map_err(|e| map_db_err!("insert books", e))?;

            let last = conn.last_insert_rowid();
            let first = last - chunk.len() as i64 + 1;
            ids.extend(first..=last);
        }
        Ok(ids)
    }

    fn update_books(&self, conn: &Connection, books: &[(i64, &Record)]) -> Result<()> {
        if books.is_empty() {
            return Ok(());
        }

        let mut stmt = conn
            .prepare_cached(
                "UPDATE books SET title = ?1, lang = ?2, format = ?3, size = ?4, date_added = ?5,
                 lib_id = ?6, lib_rate = ?7, deleted = ?8 WHERE id = ?9",
            )
            .map_err(|e| map_db_err!("prepare book update", e))?;
        for (id, record) in books {
            let [title, lang, _, _, format, size, date, lib_id, lib_rate, deleted] =
                book_values(record);
            stmt.execute(rusqlite::params![
                title, lang, format, size, date, lib_id, lib_rate, deleted, id
            ])
            .map_err(|e| map_db_err!("update book", e))?;
        }

        // Links are rewritten from the incoming record
        let ids: Vec<i64> = books.iter().map(|(id, _)| *id).collect();
        for table in LINK_TABLES {
            for chunk in ids.chunks(self.rows_per_chunk(1)) {
                let sql = format!(
                    "DELETE FROM {} WHERE book_id IN ({})",
                    table,
                    vec!["?"; chunk.len()].join(",")
                );
                conn.execute(&sql, params_from_iter(chunk.iter()))
                    .map_err(|e| map_db_err!("clear book links", e))?;
            }
        }
        Ok(())
    }

    fn link_entities(&self, conn: &Connection, books: &[(i64, &Record)]) -> Result<()> {
        let mut authors = Vec::new();
        let mut genres = Vec::new();
        let mut keywords = Vec::new();
        let mut series = Vec::new();

        for (book_id, record) in books {
            for author in &record.authors {
                authors.push([*book_id, self.caches.author_id(conn, author)?]);
            }
            for code in &record.genres {
                genres.push([*book_id, self.caches.genre_id(conn, code)?]);
            }
            for keyword in &record.keywords {
                keywords.push([*book_id, self.caches.keyword_id(conn, keyword)?]);
            }
            if let Some(s) = &record.series {
                series.push([*book_id, self.caches.series_id(conn, &s.name)?, s.number]);
            }
        }

        for pairs in [&mut authors, &mut genres, &mut keywords] {
            pairs.sort_unstable();
            pairs.dedup();
        }

        let links = [
            ("INSERT OR IGNORE INTO book_authors (book_id, author_id)", &authors),
            ("INSERT OR IGNORE INTO book_genres (book_id, genre_id)", &genres),
            ("INSERT OR IGNORE INTO book_keywords (book_id, keyword_id)", &keywords),
        ];
        for (head, pairs) in links {
            self.insert_rows(conn, head, pairs)?;
        }
        self.insert_rows(
            conn,
            "INSERT OR REPLACE INTO book_series (book_id, series_id, ser_no)",
            &series,
        )?;
        Ok(())
    }

    /// Chunked multi-row insert of fixed-width rows
    fn insert_rows<T: ToSql, const N: usize>(
        &self,
        conn: &Connection,
        head: &str,
        rows: &[[T; N]],
    ) -> Result<usize> {
        let mut written = 0;
        for chunk in rows.chunks(self.rows_per_chunk(N)) {
            let sql = format!("{} VALUES {}", head, placeholders(N, chunk.len()));
            written += conn
                .execute(&sql, params_from_iter(chunk.iter().flatten()))
                .map_err(|e| map_db_err!("insert links", e))?;
        }
        Ok(written)
    }
}

/// One INSERT per row, reading each rowid back
fn insert_books_read_back(conn: &Connection, books: &[&Record]) -> Result<Vec<i64>> {
    let sql = format!("{}{}", BOOK_INSERT, placeholders(BOOK_COLUMNS, 1));
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| map_db_err!("prepare book insert", e))?;

    let mut ids = Vec::with_capacity(books.len());
    for record in books {
        stmt.execute(params_from_iter(book_values(record).iter()))
            .map_err(|e| map_db_err!("insert book", e))?;
        ids.push(conn.last_insert_rowid());
    }
    Ok(ids)
}

/// Collapse records naming the same file; the last one wins
fn dedupe(records: &[Record]) -> Vec<&Record> {
    let mut position: HashMap<(&str, &str), usize> = HashMap::new();
    let mut unique: Vec<&Record> = Vec::with_capacity(records.len());
    for record in records {
        match position.get(&record.book_key()) {
            Some(&i) => unique[i] = record,
            None => {
                position.insert(record.book_key(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

fn book_values(record: &Record) -> [Value; BOOK_COLUMNS] {
    [
        Value::Text(record.title.clone()),
        Value::Text(record.lang.clone()),
        Value::Text(record.archive.clone()),
        Value::Text(record.file_name.clone()),
        Value::Text(record.format.clone()),
        Value::Integer(record.size),
        record
            .date_added
            .map(|d| Value::Text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        Value::Integer(record.lib_id),
        Value::Integer(record.lib_rate),
        Value::Integer(i64::from(record.deleted)),
    ]
}

/// `(?,?),(?,?)` for `rows` rows of `columns` parameters
fn placeholders(columns: usize, rows: usize) -> String {
    let row = format!("({})", vec!["?"; columns].join(","));
    vec![row; rows].join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(2, 3), "(?,?),(?,?),(?,?)");
        assert_eq!(placeholders(1, 1), "(?)");
    }

    #[test]
    fn test_dedupe_last_wins_first_position() {
        let first = crate::testutil::record("First", ("A", "", "B"), "1");
        let other = crate::testutil::record("Other", ("A", "", "B"), "2");
        let mut second = first.clone();
        second.title = "Second".to_string();
        let records = vec![first, other, second];

        let unique = dedupe(&records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "Second");
        assert_eq!(unique[1].title, "Other");
    }
}
