//! SQLite database module for shelfdex

mod bulk;
mod fold;
mod fts;
mod genres;
mod identity;
mod read;
mod schema;
mod search;
mod writer;

use crate::error::{Result, ShelfdexError};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub use bulk::{BulkReport, BulkSettings};
pub use fts::IndexMode;
pub use identity::{EntityCaches, IdentityCache};
pub use read::{
    AuthorEntry, BookDetail, BookSummary, CatalogStats, GenreEntry, LetterEntry, SeriesEntry,
};
pub use schema::{create_schema, SchemaCreateResult, SECONDARY_INDEXES};
pub use search::{sanitize_query, SearchField, SearchQuery};
pub use writer::{BatchOutcome, BatchWriter, WriterOptions, BOOK_COLUMNS};

/// Default database file name inside a data directory
pub const DB_FILE: &str = "shelfdex.db";

/// SQLite catalog database
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open or create the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ShelfdexError::io_operation("create", parent.display(), e))?;
        }

        let conn = Connection::open(path).map_err(|e| {
            ShelfdexError::Store(format!(
                "failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| ShelfdexError::Store(format!("failed to enable WAL mode: {}", e)))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| ShelfdexError::Store(format!("failed to enable foreign keys: {}", e)))?;
        fold::register(&conn)?;

        let created = create_schema(&conn).map_err(|e| {
            ShelfdexError::Store(format!("failed to create database schema: {}", e))
        })?;
        if created == SchemaCreateResult::Created {
            tracing::info!(path = %path.display(), "Created catalog database");
        }

        Ok(Database {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn get_schema_version(&self) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT value FROM index_meta WHERE key = 'schema_version'",
                [],
                |r| {
                    let s: String = r.get(0)?;
                    Ok(s.parse().unwrap_or(0))
                },
            )
            .map_err(|e| crate::map_db_err!("get schema version", e))
    }

    /// Names of the secondary indexes currently present
    pub fn secondary_indexes(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name")
            .map_err(|e| crate::map_db_err!("prepare index query", e))?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| crate::map_db_err!("list indexes", e))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Fold the WAL back into the main file before closing
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

#[cfg(test)]
mod tests;
