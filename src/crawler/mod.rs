//! Crawler module for listing discovery and review harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with pacing and retry logic
//! - Offset-based pagination of paged feeds
//! - Listing discovery from search results
//! - Review feed crawling per listing
//! - Overall harvest coordination

mod context;
mod coordinator;
mod discovery;
mod feeds;
mod fetcher;
mod paginator;
mod report;

pub use context::CrawlContext;
pub use coordinator::Harvester;
pub use discovery::discover;
pub use feeds::{crawl_feed, crawl_not_recommended, crawl_recommended, FeedHarvest};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use paginator::{walk, PageWalk, WalkEnd, WalkLimits};
pub use report::{HarvestReport, ListingFailure, ListingReviews};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete harvest over HTTP
///
/// This is the main entry point. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Discover up to `count` listings for `query`
/// 3. Crawl the recommended and not-recommended feeds of each listing
/// 4. Return every collected review together with per-listing failures
///
/// # Example
///
/// ```no_run
/// use review_ripple::config::Config;
/// use review_ripple::crawler::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = harvest(&Config::default(), "London", 10).await?;
/// println!("{} reviews", report.review_count());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: &Config, query: &str, count: usize) -> Result<HarvestReport, HarvestError> {
    Harvester::new(config)?.harvest(query, count).await
}
