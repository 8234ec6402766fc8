//! Configuration for shelfdex
//!
//! Configuration lives in `shelfdex.toml`, next to the database unless a path
//! is given explicitly. Every field has a default, so a missing file is fine.

pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{Result, ShelfdexError};

pub use types::{
    BatchErrorPolicy, IdAssignment, IngestConfig, LibraryConfig, SearchConfig, DEFAULT_BATCH_SIZE,
    DEFAULT_LANGUAGE, DEFAULT_MAX_PARAMS, DEFAULT_SEARCH_LIMIT,
};

/// File name looked up next to the database
pub const CONFIG_FILE: &str = "shelfdex.toml";

impl LibraryConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: LibraryConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `shelfdex.toml` from `dir` if present, otherwise defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShelfdexError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingest.batch_size == 0 {
            crate::bail_invalid!("ingest.batch_size", 0);
        }
        if self.ingest.channel_capacity == 0 {
            crate::bail_invalid!("ingest.channel_capacity", 0);
        }
        if self.ingest.max_params < crate::db::BOOK_COLUMNS {
            crate::bail_invalid!("ingest.max_params", self.ingest.max_params);
        }
        if self.ingest.archive_extensions.is_empty() {
            crate::bail_invalid!("ingest.archive_extensions", "[]");
        }
        if self.search.default_limit == 0 {
            crate::bail_invalid!("search.default_limit", 0);
        }
        Ok(())
    }
}
