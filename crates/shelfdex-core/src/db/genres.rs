//! Backfill of genre display and transliterated names

use rusqlite::params;

use super::Database;
use crate::error::{Result, ShelfdexError};
use crate::genre;
use crate::map_db_err;

impl Database {
    /// Recompute every genre's display and transliterated names, writing
    /// only rows whose stored values differ. Returns the number updated.
    #[tracing::instrument(skip(self))]
    pub fn normalize_genres(&self) -> Result<usize> {
        let tx = self
            .conn()
            .unchecked_transaction()
            .map_err(|e| ShelfdexError::transaction("start", e))?;

        let stored: Vec<(i64, String, String, String)> = {
            let mut stmt = tx
                .prepare("SELECT id, code, name, translit FROM genres")
                .map_err(|e| map_db_err!("prepare genre scan", e))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        let mut updated = 0;
        {
            let mut stmt = tx
                .prepare("UPDATE genres SET name = ?1, translit = ?2 WHERE id = ?3")
                .map_err(|e| map_db_err!("prepare genre update", e))?;
            for (id, code, name, translit) in stored {
                let names = genre::normalize(&code);
                if names.name == name && names.translit == translit {
                    continue;
                }
                stmt.execute(params![names.name, names.translit, id])
                    .map_err(|e| map_db_err!("update genre", e))?;
                updated += 1;
            }
        }

        tx.commit()
            .map_err(|e| ShelfdexError::transaction("commit", e))?;
        tracing::debug!(updated, "Genres normalized");
        Ok(updated)
    }
}
