//! Tracing setup and identity-cache counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that replaces the CLI-derived filter
pub const LOG_ENV: &str = "SHELFDEX_LOG";

/// Counters for one identity cache.
///
/// Lock-free, so a lookup under the cache's read lock can bump them.
#[derive(Debug, Default)]
pub struct ResourceMetrics {
    preloaded: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResourceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries loaded from the store before a scan
    pub fn record_preloaded(&self, count: u64) {
        self.preloaded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn preloaded(&self) -> u64 {
        self.preloaded.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Percentage of lookups answered without touching the store
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits();
        match hits + self.cache_misses() {
            0 => 0.0,
            total => hits as f64 * 100.0 / total as f64,
        }
    }
}

/// Log one cache's counters at debug level.
///
/// ```rust,ignore
/// log_resource_metrics!(cache.metrics(), "authors");
/// ```
#[macro_export]
macro_rules! log_resource_metrics {
    ($metrics:expr, $cache:expr) => {
        tracing::debug!(
            cache = $cache,
            preloaded = $metrics.preloaded(),
            hits = $metrics.cache_hits(),
            misses = $metrics.cache_misses(),
            hit_rate = $metrics.cache_hit_rate(),
            "identity cache"
        );
    };
}

/// Log elapsed time at trace level.
///
/// ```rust,ignore
/// let start = Instant::now();
/// trace_time!(start, "flush_batch", books = batch.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Filter directives for the binary and the core crate.
///
/// A level containing `=` is taken as a full directive string.
fn directives(verbose: bool, log_level: Option<&str>) -> String {
    let level = match log_level {
        Some(level) if level.contains('=') => return level.to_string(),
        Some(level) => level,
        None if verbose => "debug",
        None => "warn",
    };
    format!("shelfdex={level},shelfdex_core={level}")
}

/// Install the global subscriber; logs go to stderr so stdout stays parseable
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(directives(verbose, log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(false)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_rate() {
        let metrics = ResourceMetrics::new();
        assert_eq!(metrics.cache_hit_rate(), 0.0);

        metrics.record_preloaded(10);
        for _ in 0..3 {
            metrics.record_cache_hit();
        }
        metrics.record_cache_miss();

        assert_eq!(metrics.preloaded(), 10);
        assert!((metrics.cache_hit_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_directives() {
        assert_eq!(directives(false, None), "shelfdex=warn,shelfdex_core=warn");
        assert_eq!(directives(true, None), "shelfdex=debug,shelfdex_core=debug");
        assert_eq!(directives(true, Some("trace")), "shelfdex=trace,shelfdex_core=trace");
        assert_eq!(directives(false, Some("shelfdex_core::db=trace")), "shelfdex_core::db=trace");
    }
}
