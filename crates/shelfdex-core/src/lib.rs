//! Shelfdex Core Library
//!
//! Ingests INPX library indexes into SQLite and keeps an FTS5 search index
//! over the catalog.

pub mod cancel;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod genre;
pub mod ingest;
pub mod inpx;
pub mod logging;

#[cfg(test)]
pub(crate) mod testutil;
