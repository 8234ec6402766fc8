//! Command implementations for shelfdex

pub mod catalog;
pub mod dispatch;
pub mod format;
pub mod ingest;
pub mod reindex;
pub mod search;
pub mod show;
