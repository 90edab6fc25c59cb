//! Batch scheduler for concurrent fetches
//!
//! This module handles:
//! - Splitting URL lists into fixed-width batches
//! - Issuing every fetch of a batch concurrently and waiting for all of them
//! - The politeness pause between batches
//! - Cooperative cancellation checked between batches
//!
//! Peak concurrency is bounded by the batch width regardless of how many URLs
//! are queued.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchError, Fetcher};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared flag asking a run to stop at the next batch boundary
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one fetch inside a batch
#[derive(Debug)]
pub struct BatchOutcome {
    /// The URL that was requested
    pub url: String,

    /// Body on success, the classified failure otherwise
    pub result: Result<String, FetchError>,
}

/// Fixed-width batch pool
///
/// Within a batch all fetches run concurrently; the scheduler waits for the
/// whole batch (each fetch succeeding or failing independently) before the
/// caller moves on.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    width: usize,
    delay: Duration,
    cancel: CancelFlag,
}

impl BatchScheduler {
    /// Creates a scheduler
    ///
    /// A width of zero is treated as one.
    pub fn new(width: usize, delay: Duration, cancel: CancelFlag) -> Self {
        Self {
            width: width.max(1),
            delay,
            cancel,
        }
    }

    /// Creates a scheduler from crawler configuration
    pub fn from_config(config: &CrawlerConfig, cancel: CancelFlag) -> Self {
        Self::new(
            config.batch_width,
            Duration::from_millis(config.batch_delay_ms),
            cancel,
        )
    }

    /// Number of fetches issued concurrently per batch
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns true once the run was asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fetches one batch concurrently
    ///
    /// The returned outcomes are in the same order as `urls`, whichever fetch
    /// finished first.
    pub async fn fetch_batch(&self, fetcher: &Fetcher, urls: &[String]) -> Vec<BatchOutcome> {
        debug_assert!(urls.len() <= self.width, "batch wider than scheduler");

        let results = join_all(urls.iter().map(|url| fetcher.fetch(url))).await;

        let outcomes: Vec<BatchOutcome> = urls
            .iter()
            .cloned()
            .zip(results)
            .map(|(url, result)| BatchOutcome { url, result })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::trace!(
            "Batch of {} finished: {} ok, {} failed",
            outcomes.len(),
            outcomes.len() - failed,
            failed
        );

        outcomes
    }

    /// Sleeps for the politeness delay between batches
    pub async fn throttle(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
