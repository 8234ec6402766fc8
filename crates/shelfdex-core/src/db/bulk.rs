//! Bulk-mode performance controller
//!
//! `begin_bulk` trades durability and index upkeep for write throughput;
//! `end_bulk` puts everything back. Only `begin_bulk` can fail the caller:
//! once the scan has run, every restore step is attempted and failures are
//! collected as warnings.

use serde::Serialize;

use super::schema::{create_index_sql, SECONDARY_INDEXES};
use super::Database;
use crate::error::{Result, ShelfdexError};
use crate::map_db_err;

/// Page cache used while bulk writing, in KiB (negative per SQLite convention)
pub const BULK_CACHE_SIZE: i64 = -262_144;

/// Store tunables captured before bulk mode, restored afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkSettings {
    pub synchronous: i64,
    pub cache_size: i64,
    pub wal_autocheckpoint: i64,
}

impl BulkSettings {
    pub fn capture(db: &Database) -> Result<Self> {
        Ok(Self {
            synchronous: db.pragma_i64("synchronous")?,
            cache_size: db.pragma_i64("cache_size")?,
            wal_autocheckpoint: db.pragma_i64("wal_autocheckpoint")?,
        })
    }
}

/// Outcome of leaving bulk mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub indexes_restored: usize,
    pub genres_normalized: usize,
    pub documents_indexed: usize,
    pub warnings: Vec<String>,
}

impl BulkReport {
    fn check<T>(&mut self, step: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(step, error = %e, "Bulk-mode step failed");
                self.warnings.push(format!("{}: {}", step, e));
                None
            }
        }
    }
}

impl Database {
    fn pragma_i64(&self, name: &str) -> Result<i64> {
        self.conn()
            .pragma_query_value(None, name, |row| row.get(0))
            .map_err(|e| map_db_err!(&format!("read pragma {}", name), e))
    }

    fn set_pragma(&self, name: &str, value: i64) -> Result<()> {
        self.conn()
            .pragma_update(None, name, value)
            .map_err(|e| map_db_err!(&format!("set pragma {}", name), e))
    }

    fn apply_settings(&self, settings: &BulkSettings) -> Result<()> {
        self.set_pragma("synchronous", settings.synchronous)?;
        self.set_pragma("cache_size", settings.cache_size)?;
        self.set_pragma("wal_autocheckpoint", settings.wal_autocheckpoint)
    }

    fn drop_secondary_indexes(&self) -> Result<()> {
        for (name, _) in SECONDARY_INDEXES {
            self.conn()
                .execute(&format!("DROP INDEX IF EXISTS {}", name), [])
                .map_err(|e| map_db_err!(&format!("drop index {}", name), e))?;
        }
        Ok(())
    }

    fn create_secondary_indexes(&self) -> Result<usize> {
        for (name, target) in SECONDARY_INDEXES {
            self.conn()
                .execute(&create_index_sql(name, target), [])
                .map_err(|e| map_db_err!(&format!("create index {}", name), e))?;
        }
        Ok(SECONDARY_INDEXES.len())
    }

    /// Force the write-ahead log into the main database file
    pub fn checkpoint(&self) -> Result<()> {
        let busy: i64 = self
            .conn()
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| row.get(0))
            .map_err(|e| map_db_err!("checkpoint", e))?;
        if busy != 0 {
            return Err(ShelfdexError::Store(
                "checkpoint could not complete: database busy".to_string(),
            ));
        }
        Ok(())
    }

    /// Enter bulk mode, returning the settings to restore.
    ///
    /// The caller is expected to warm its identity caches before this.
    #[tracing::instrument(skip(self))]
    pub fn begin_bulk(&self) -> Result<BulkSettings> {
        let settings = BulkSettings::capture(self)?;
        let relaxed = BulkSettings {
            synchronous: 0,
            cache_size: BULK_CACHE_SIZE,
            wal_autocheckpoint: 0,
        };
        if let Err(e) = self.apply_settings(&relaxed) {
            tracing::warn!(error = %e, "Could not relax store settings");
        }
        if let Err(e) = self.suspend_search_index() {
            tracing::warn!(error = %e, "Could not suspend search index maintenance");
        }

        if let Err(e) = self.drop_secondary_indexes() {
            let report = self.end_bulk(settings);
            tracing::debug!(warnings = report.warnings.len(), "Bulk mode unwound");
            return Err(e);
        }

        tracing::info!(?settings, "Bulk mode on");
        Ok(settings)
    }

    /// Leave bulk mode: indexes, genre names, search index, settings,
    /// checkpoint, in that order
    #[tracing::instrument(skip(self))]
    pub fn end_bulk(&self, settings: BulkSettings) -> BulkReport {
        let mut report = BulkReport::default();

        let restored = self.create_secondary_indexes();
        report.indexes_restored = report.check("recreate indexes", restored).unwrap_or(0);

        let normalized = self.normalize_genres();
        report.genres_normalized = report.check("normalize genres", normalized).unwrap_or(0);

        let indexed = self.rebuild_search_index();
        report.documents_indexed = report.check("rebuild search index", indexed).unwrap_or(0);

        let applied = self.apply_settings(&settings);
        report.check("restore settings", applied);

        let flushed = self.checkpoint();
        report.check("checkpoint", flushed);

        tracing::info!(
            documents = report.documents_indexed,
            warnings = report.warnings.len(),
            "Bulk mode off"
        );
        report
    }
}
