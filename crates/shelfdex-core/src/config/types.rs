//! Configuration type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShelfdexError;

/// Default number of records flushed per transaction
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// SQLite's bound-parameter ceiling (SQLITE_MAX_VARIABLE_NUMBER since 3.32)
pub const DEFAULT_MAX_PARAMS: usize = 32766;

/// Search results returned when no limit is given
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Language assumed for books with an empty language field
pub const DEFAULT_LANGUAGE: &str = "ru";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// How surrogate IDs are assigned to books inserted in one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdAssignment {
    /// One multi-row INSERT per chunk; IDs back-computed from the last rowid
    #[default]
    Contiguous,
    /// One INSERT per row, reading each generated rowid back
    ReadBack,
}

/// What the ingest pipeline does when a batch fails to commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchErrorPolicy {
    /// Log the failure, drop the batch and keep ingesting
    #[default]
    Continue,
    /// Stop the ingest and report the batch error
    Abort,
    /// Retry the batch once after a backoff, then drop it
    RetryThenContinue,
}

impl FromStr for BatchErrorPolicy {
    type Err = ShelfdexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(BatchErrorPolicy::Continue),
            "abort" => Ok(BatchErrorPolicy::Abort),
            "retry-then-continue" | "retry" => Ok(BatchErrorPolicy::RetryThenContinue),
            other => Err(ShelfdexError::invalid_value("batch error policy", other)),
        }
    }
}

impl fmt::Display for BatchErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchErrorPolicy::Continue => write!(f, "continue"),
            BatchErrorPolicy::Abort => write!(f, "abort"),
            BatchErrorPolicy::RetryThenContinue => write!(f, "retry-then-continue"),
        }
    }
}

/// Ingest pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Records per committed batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Records buffered between scanner and writer
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Upper bound on bound parameters in one statement
    #[serde(default = "default_max_params")]
    pub max_params: usize,

    #[serde(default)]
    pub id_assignment: IdAssignment,

    #[serde(default)]
    pub on_batch_error: BatchErrorPolicy,

    /// Delay before retrying a failed batch
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Content archive extensions, tried in order
    #[serde(default = "default_archive_extensions")]
    pub archive_extensions: Vec<String>,

    /// Wrap the scan in the bulk-mode sequence
    #[serde(default = "default_bulk")]
    pub bulk: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            channel_capacity: default_channel_capacity(),
            max_params: default_max_params(),
            id_assignment: IdAssignment::default(),
            on_batch_error: BatchErrorPolicy::default(),
            retry_backoff_ms: default_retry_backoff_ms(),
            archive_extensions: default_archive_extensions(),
            bulk: default_bulk(),
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Language code that books with no language are treated as
    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_limit: default_limit(),
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_channel_capacity() -> usize {
    4096
}

fn default_max_params() -> usize {
    DEFAULT_MAX_PARAMS
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_archive_extensions() -> Vec<String> {
    vec!["zip".to_string(), "7z".to_string()]
}

fn default_bulk() -> bool {
    true
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
