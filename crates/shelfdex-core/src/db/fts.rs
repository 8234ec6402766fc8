//! Full-text search index maintenance

use std::time::Instant;

use rusqlite::{Connection, OptionalExtension};

use super::schema::{doc_expr, AUTHOR_DOC_SQL, FTS_MODE_KEY, GENRE_DOC_SQL, SERIES_DOC_SQL};
use super::Database;
use crate::error::{Result, ShelfdexError};
use crate::{map_db_err, trace_time};

/// Whether the search index follows catalog writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Triggers keep documents current on every write
    Incremental,
    /// Triggers are inert; a rebuild is required before searching
    Suspended,
}

impl IndexMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexMode::Incremental => "incremental",
            IndexMode::Suspended => "suspended",
        }
    }
}

fn set_mode(conn: &Connection, mode: IndexMode) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)",
        [FTS_MODE_KEY, mode.as_str()],
    )
    .map_err(|e| map_db_err!("set search index mode", e))?;
    Ok(())
}

impl Database {
    pub fn search_index_mode(&self) -> Result<IndexMode> {
        let value: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM index_meta WHERE key = ?1",
                [FTS_MODE_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| map_db_err!("read search index mode", e))?;

        Ok(match value.as_deref() {
            Some("suspended") => IndexMode::Suspended,
            _ => IndexMode::Incremental,
        })
    }

    /// Stop per-write index maintenance. Only the bulk controller does this.
    pub(crate) fn suspend_search_index(&self) -> Result<()> {
        set_mode(self.conn(), IndexMode::Suspended)?;
        tracing::debug!("Search index maintenance suspended");
        Ok(())
    }

    /// Regenerate every search document from the catalog tables and return
    /// to incremental maintenance. Runs in one transaction, so readers see
    /// either the old index or the new one.
    #[tracing::instrument(skip(self))]
    pub fn rebuild_search_index(&self) -> Result<usize> {
        let start = Instant::now();
        let tx = self
            .conn()
            .unchecked_transaction()
            .map_err(|e| ShelfdexError::transaction("start", e))?;

        tx.execute("DELETE FROM books_fts", [])
            .map_err(|e| map_db_err!("clear search index", e))?;

        let sql = format!(
            "INSERT INTO books_fts (rowid, title, author, series, genre)
             SELECT b.id, b.title, {}, {}, {} FROM books b WHERE b.deleted = 0",
            doc_expr(AUTHOR_DOC_SQL, "b.id"),
            doc_expr(SERIES_DOC_SQL, "b.id"),
            doc_expr(GENRE_DOC_SQL, "b.id"),
        );
        let documents = tx
            .execute(&sql, [])
            .map_err(|e| map_db_err!("populate search index", e))?;

        set_mode(&tx, IndexMode::Incremental)?;
        tx.commit()
            .map_err(|e| ShelfdexError::transaction("commit", e))?;

        trace_time!(start, "rebuild_search_index", documents = documents);
        tracing::info!(documents, "Search index rebuilt");
        Ok(documents)
    }
}
