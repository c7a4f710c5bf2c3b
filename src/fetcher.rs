//! HTTP fetcher for downloading published prefix lists.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::RangepressError;
use crate::utils::format_bytes;

const RETRY_DELAY_MS: u64 = 2000;

/// Maximum size per source file (10 MB)
/// Published range lists run well under 2 MB, so 10 MB provides ample margin
const MAX_SOURCE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum total size for all downloads combined (50 MB)
const MAX_TOTAL_SIZE: usize = 50 * 1024 * 1024;

/// One URL to download, tagged with the artifact unit it feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub unit: String,
    pub url: String,
}

/// Outcome of a single fetch job
///
/// Failures are carried rather than propagated so one dead mirror
/// cannot sink the rest of the run.
#[derive(Debug)]
pub struct FetchResult {
    pub job: FetchJob,
    pub outcome: Result<String, RangepressError>,
}

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    concurrency: usize,
    /// Cumulative download size tracker (thread-safe for concurrent fetches)
    total_downloaded: AtomicUsize,
}

impl Fetcher {
    /// Create a new fetcher from fetch settings
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("rangepress/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            concurrency: config.concurrency,
            total_downloaded: AtomicUsize::new(0),
        })
    }

    /// Get the total bytes downloaded so far
    pub fn total_downloaded(&self) -> usize {
        self.total_downloaded.load(Ordering::Relaxed)
    }

    /// Fetch all jobs concurrently with limited parallelism
    ///
    /// Limits concurrent requests to the configured level to avoid:
    /// - Resource exhaustion (too many TCP connections)
    /// - Rate limiting from list servers
    /// - High memory usage during concurrent downloads
    pub async fn fetch_all(&self, jobs: Vec<FetchJob>) -> Vec<FetchResult> {
        stream::iter(jobs)
            .map(|job| async move {
                let outcome = self.fetch_source(&job.url).await;
                FetchResult { job, outcome }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    /// Fetch a single source body with retry logic
    pub async fn fetch_source(&self, url: &str) -> Result<String, RangepressError> {
        info!("Fetching {}...", url);

        match self.fetch_with_retry(url).await {
            Ok(body) => {
                debug!("Fetched {} ({})", url, format_bytes(body.len() as u64));
                Ok(body)
            }
            Err(e) => Err(RangepressError::Fetch {
                source: url.to_string(),
                reason: format!("{:#}", e),
            }),
        }
    }

    /// Fetch content with retry logic and size validation
    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = RETRY_DELAY_MS * (1 << (attempt - 1));
                debug!("Retry {} after {}ms for {}", attempt, delay, url);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        // Check Content-Length header if available
                        if let Some(content_length) = response.content_length() {
                            if content_length as usize > MAX_SOURCE_SIZE {
                                return Err(anyhow::anyhow!(
                                    "Response too large: {} bytes (max: {} bytes)",
                                    content_length,
                                    MAX_SOURCE_SIZE
                                ));
                            }
                            // Check cumulative limit before downloading
                            let current_total = self.total_downloaded.load(Ordering::Relaxed);
                            if current_total + content_length as usize > MAX_TOTAL_SIZE {
                                return Err(anyhow::anyhow!(
                                    "Cumulative download limit exceeded: {} + {} > {} bytes",
                                    current_total,
                                    content_length,
                                    MAX_TOTAL_SIZE
                                ));
                            }
                        }

                        let body = response
                            .text()
                            .await
                            .context("Failed to read response body")?;

                        // Double-check actual size after download
                        if body.len() > MAX_SOURCE_SIZE {
                            return Err(anyhow::anyhow!(
                                "Downloaded content too large: {} bytes (max: {} bytes)",
                                body.len(),
                                MAX_SOURCE_SIZE
                            ));
                        }

                        // Update cumulative download counter
                        let new_total = self
                            .total_downloaded
                            .fetch_add(body.len(), Ordering::Relaxed)
                            + body.len();
                        if new_total > MAX_TOTAL_SIZE {
                            return Err(anyhow::anyhow!(
                                "Cumulative download limit exceeded: {} bytes (max: {} bytes)",
                                new_total,
                                MAX_TOTAL_SIZE
                            ));
                        }

                        return Ok(body);
                    }
                    last_error = Some(anyhow::anyhow!("HTTP {}", response.status()));
                }
                Err(e) => {
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Unknown error")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_defaults() {
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        assert_eq!(fetcher.max_retries, 3);
        assert_eq!(fetcher.concurrency, 6);
        assert_eq!(fetcher.total_downloaded(), 0);
    }

    #[test]
    fn test_fetch_job_clone() {
        let job = FetchJob {
            unit: "amazon_ipv4".to_string(),
            url: "https://example.com/list.txt".to_string(),
        };
        assert_eq!(job.clone(), job);
    }

    #[tokio::test]
    async fn test_fetch_all_no_jobs() {
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let results = fetcher.fetch_all(Vec::new()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_source_unresolvable_host() {
        let config = FetchConfig {
            timeout_secs: 2,
            max_retries: 1,
            concurrency: 1,
        };
        let fetcher = Fetcher::new(&config).unwrap();
        let result = fetcher
            .fetch_source("https://rangepress-test.invalid/list.txt")
            .await;

        match result {
            Err(RangepressError::Fetch { source, reason }) => {
                assert_eq!(source, "https://rangepress-test.invalid/list.txt");
                assert!(!reason.is_empty());
            }
            Ok(_) => panic!("Expected fetch failure for .invalid host"),
            Err(other) => panic!("Expected Fetch error, got {other:?}"),
        }
    }
}
