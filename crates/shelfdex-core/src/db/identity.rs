//! Natural key to surrogate ID caches
//!
//! One cache per entity kind. Reads share the lock; a miss takes the write
//! lock for the whole insert-or-fetch so two resolvers never race on the
//! same key. IDs handed out inside an uncommitted transaction are staged and
//! must be committed or rolled back together with it.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::genre;
use crate::inpx::AuthorName;
use crate::log_resource_metrics;
use crate::logging::ResourceMetrics;
use crate::map_db_err;

#[derive(Debug)]
struct Inner<K> {
    ids: HashMap<K, i64>,
    staged: Vec<K>,
}

/// Thread-safe natural key → surrogate ID map
#[derive(Debug)]
pub struct IdentityCache<K> {
    name: &'static str,
    inner: RwLock<Inner<K>>,
    metrics: ResourceMetrics,
}

impl<K: Eq + Hash + Clone> IdentityCache<K> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(Inner {
                ids: HashMap::new(),
                staged: Vec::new(),
            }),
            metrics: ResourceMetrics::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<i64> {
        self.inner.read().ids.get(key).copied()
    }

    /// Return the cached ID, or run `fetch` under the write lock and cache it
    pub fn resolve<F>(&self, key: &K, fetch: F) -> Result<i64>
    where
        F: FnOnce(&K) -> Result<i64>,
    {
        if let Some(id) = self.get(key) {
            self.metrics.record_cache_hit();
            return Ok(id);
        }

        let mut inner = self.inner.write();
        if let Some(id) = inner.ids.get(key).copied() {
            self.metrics.record_cache_hit();
            return Ok(id);
        }

        self.metrics.record_cache_miss();
        let id = fetch(key)?;
        inner.ids.insert(key.clone(), id);
        inner.staged.push(key.clone());
        Ok(id)
    }

    pub fn preload(&self, entries: impl IntoIterator<Item = (K, i64)>) {
        let mut inner = self.inner.write();
        let before = inner.ids.len();
        inner.ids.extend(entries);
        self.metrics.record_preloaded((inner.ids.len() - before) as u64);
    }

    /// Keep the IDs resolved since the last commit/rollback
    pub fn commit_staged(&self) {
        self.inner.write().staged.clear();
    }

    /// Forget IDs resolved since the last commit; their rows were rolled back
    pub fn rollback_staged(&self) {
        let mut inner = self.inner.write();
        let staged = std::mem::take(&mut inner.staged);
        for key in staged {
            inner.ids.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> &ResourceMetrics {
        &self.metrics
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The caches of one ingestion session
#[derive(Debug)]
pub struct EntityCaches {
    pub authors: IdentityCache<AuthorName>,
    pub genres: IdentityCache<String>,
    pub series: IdentityCache<String>,
    pub keywords: IdentityCache<String>,
}

impl Default for EntityCaches {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCaches {
    pub fn new() -> Self {
        Self {
            authors: IdentityCache::new("authors"),
            genres: IdentityCache::new("genres"),
            series: IdentityCache::new("series"),
            keywords: IdentityCache::new("keywords"),
        }
    }

    /// Load every existing natural key from the store
    #[tracing::instrument(skip_all)]
    pub fn warm(&self, db: &super::Database) -> Result<()> {
        let conn = db.conn();

        let mut stmt = conn
            .prepare("SELECT id, first_name, middle_name, last_name FROM authors")
            .map_err(|e| map_db_err!("prepare author preload", e))?;
        let authors = stmt
            .query_map([], |row| {
                Ok((
                    AuthorName {
                        first: row.get(1)?,
                        middle: row.get(2)?,
                        last: row.get(3)?,
                    },
                    row.get(0)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<(AuthorName, i64)>>>()?;
        self.authors.preload(authors);

        self.genres.preload(load_names(conn, "SELECT id, code FROM genres")?);
        self.series.preload(load_names(conn, "SELECT id, name FROM series")?);
        self.keywords.preload(load_names(conn, "SELECT id, name FROM keywords")?);

        tracing::info!(
            authors = self.authors.len(),
            genres = self.genres.len(),
            series = self.series.len(),
            keywords = self.keywords.len(),
            "Identity caches warmed"
        );
        Ok(())
    }

    pub fn commit_staged(&self) {
        self.authors.commit_staged();
        self.genres.commit_staged();
        self.series.commit_staged();
        self.keywords.commit_staged();
    }

    pub fn rollback_staged(&self) {
        self.authors.rollback_staged();
        self.genres.rollback_staged();
        self.series.rollback_staged();
        self.keywords.rollback_staged();
    }

    pub fn log_metrics(&self) {
        for metrics in [
            (self.authors.name(), self.authors.metrics()),
            (self.genres.name(), self.genres.metrics()),
            (self.series.name(), self.series.metrics()),
            (self.keywords.name(), self.keywords.metrics()),
        ] {
            log_resource_metrics!(metrics.1, metrics.0);
        }
    }

    pub fn author_id(&self, conn: &Connection, author: &AuthorName) -> Result<i64> {
        self.authors.resolve(author, |a| {
            conn.execute(
                "INSERT OR IGNORE INTO authors (first_name, middle_name, last_name) VALUES (?1, ?2, ?3)",
                params![a.first, a.middle, a.last],
            )
            .map_err(|e| map_db_err!("insert author", e))?;
            conn.query_row(
                "SELECT id FROM authors WHERE last_name = ?1 AND first_name = ?2 AND middle_name = ?3",
                params![a.last, a.first, a.middle],
                |row| row.get(0),
            )
            .map_err(|e| map_db_err!("fetch author id", e))
        })
    }

    pub fn genre_id(&self, conn: &Connection, code: &str) -> Result<i64> {
        self.genres.resolve(&code.to_string(), |code| {
            let names = genre::normalize(code);
            conn.execute(
                "INSERT OR IGNORE INTO genres (code, name, translit) VALUES (?1, ?2, ?3)",
                params![code, names.name, names.translit],
            )
            .map_err(|e| map_db_err!("insert genre", e))?;
            fetch_id(conn, "SELECT id FROM genres WHERE code = ?1", code, "genre")
        })
    }

    pub fn series_id(&self, conn: &Connection, name: &str) -> Result<i64> {
        self.series.resolve(&name.to_string(), |name| {
            conn.execute("INSERT OR IGNORE INTO series (name) VALUES (?1)", [name])
                .map_err(|e| map_db_err!("insert series", e))?;
            fetch_id(conn, "SELECT id FROM series WHERE name = ?1", name, "series")
        })
    }

    pub fn keyword_id(&self, conn: &Connection, name: &str) -> Result<i64> {
        self.keywords.resolve(&name.to_string(), |name| {
            conn.execute("INSERT OR IGNORE INTO keywords (name) VALUES (?1)", [name])
                .map_err(|e| map_db_err!("insert keyword", e))?;
            fetch_id(conn, "SELECT id FROM keywords WHERE name = ?1", name, "keyword")
        })
    }
}

fn fetch_id(conn: &Connection, sql: &str, key: &str, entity: &str) -> Result<i64> {
    conn.query_row(sql, [key], |row| row.get(0))
        .optional()
        .map_err(|e| map_db_err!(&format!("fetch {} id", entity), e))?
        .ok_or_else(|| crate::error::ShelfdexError::not_found(entity, key))
}

fn load_names(conn: &Connection, sql: &str) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| map_db_err!("prepare preload", e))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(1)?, row.get(0)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
