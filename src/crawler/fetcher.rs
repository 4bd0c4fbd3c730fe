//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with the configured user agent
//! - GET requests returning the raw page body
//! - Global request pacing shared by every fetch
//! - Retry with exponential backoff for transient failures
//! - Error classification

use crate::config::{Config, CrawlerConfig, SiteConfig};
use crate::{ConfigError, HarvestError, TransportError};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

type GenericRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Source of raw page bodies
///
/// Implementations surface failures (timeouts, non-success statuses) to the
/// caller; pagination never treats a failed fetch as an empty page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `site` - Provides the User-Agent sent with every request
/// * `crawler` - Provides the request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    site: &SiteConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout_secs);

    Client::builder()
        .user_agent(site.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 429 | Retry with backoff |
/// | HTTP 5xx | Retry with backoff |
/// | Timeout | Retry with backoff |
/// | Body read failure | Retry with backoff |
/// | Other HTTP 4xx | Fail immediately |
/// | Connection refused | Fail immediately |
///
/// Every attempt, retries included, waits for a token from the shared rate
/// limiter first.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    rate_limiter: Arc<GenericRateLimiter>,
    backoff: ExponentialBuilder,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("client", &self.client)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.site, &config.crawler)?;

        let per_second = NonZeroU32::new(config.crawler.requests_per_second).ok_or_else(|| {
            ConfigError::Validation("requests_per_second must be >= 1".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(config.retry.min_delay_ms))
            .with_max_delay(Duration::from_millis(config.retry.max_delay_ms))
            .with_max_times(config.retry.max_retries)
            .with_jitter();

        Ok(Self {
            client,
            rate_limiter,
            backoff,
        })
    }

    /// One paced GET attempt
    async fn fetch_once(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.rate_limiter.until_ready().await;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| TransportError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        (|| self.fetch_once(url))
            .retry(self.backoff.clone())
            .sleep(sleep)
            .when(TransportError::is_retryable)
            .notify(|err: &TransportError, delay: Duration| {
                warn!(
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "retrying page request"
                );
            })
            .await
    }
}
