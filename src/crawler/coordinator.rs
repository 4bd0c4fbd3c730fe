//! Harvest coordinator: discovery followed by a bounded pool of listing crawls
//!
//! This module orchestrates a full harvest:
//! - Discovering listings for the query
//! - Crawling both review feeds of every listing, a bounded number at a time
//! - Collecting partial successes and per-listing failures into one report

use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::discovery::discover;
use crate::crawler::feeds::{crawl_feed, FeedHarvest};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::report::{HarvestReport, ListingFailure, ListingReviews};
use crate::model::{Feed, ListingId};
use crate::HarvestError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Main harvest coordinator
pub struct Harvester {
    context: Arc<CrawlContext>,
    semaphore: Arc<Semaphore>,
}

impl Harvester {
    /// Creates a harvester that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Configuration is valid and the client was built
    /// * `Err(HarvestError)` - Invalid configuration or client setup failure
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::new(config)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a harvester on top of any page source
    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, HarvestError> {
        let context = CrawlContext::new(config, fetcher)?;

        Ok(Self {
            context: Arc::new(context),
            semaphore: Arc::new(Semaphore::new(config.crawler.max_concurrent_listings)),
        })
    }

    pub fn context(&self) -> &CrawlContext {
        &self.context
    }

    /// Discovers up to `count` listings for `query`
    pub async fn discover(&self, query: &str, count: usize) -> Result<Vec<ListingId>, HarvestError> {
        discover(&self.context, query, count).await
    }

    /// Runs a full harvest
    ///
    /// # Flow
    ///
    /// 1. Discover up to `count` listings (a failure here aborts the harvest)
    /// 2. Spawn one task per listing; at most `max-concurrent-listings` run at once
    /// 3. Inside a task, crawl both feeds concurrently
    /// 4. Record feed failures without aborting sibling listings
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestReport)` - Listings in discovery order, plus failures
    /// * `Err(HarvestError)` - Discovery failed
    pub async fn harvest(&self, query: &str, count: usize) -> Result<HarvestReport, HarvestError> {
        let started_at = Utc::now();
        info!("Starting harvest for '{}' (up to {} listings)", query, count);

        let listings = self.discover(query, count).await?;

        let mut handles = Vec::with_capacity(listings.len());
        for listing in listings {
            let context = self.context.clone();
            let semaphore = self.semaphore.clone();
            let task_listing = listing.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                harvest_listing(&context, task_listing).await
            });

            handles.push((listing, handle));
        }

        let mut harvested = Vec::with_capacity(handles.len());
        let mut failures = Vec::new();
        for (listing, handle) in handles {
            match handle.await {
                Ok((reviews, listing_failures)) => {
                    harvested.push(reviews);
                    failures.extend(listing_failures);
                }
                Err(e) => {
                    error!("Harvest task for {} failed: {}", listing, e);
                    harvested.push(ListingReviews {
                        listing: listing.clone(),
                        recommended: None,
                        not_recommended: None,
                    });
                    failures.push(ListingFailure {
                        listing,
                        feed: None,
                        error: HarvestError::Join(e),
                    });
                }
            }
        }

        let report = HarvestReport {
            query: query.to_string(),
            listings: harvested,
            failures,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Harvest completed: {} reviews from {} listings, {} failures in {:?}",
            report.review_count(),
            report.listings.len(),
            report.failures.len(),
            (report.finished_at - report.started_at).to_std().unwrap_or_default()
        );

        Ok(report)
    }
}

/// Crawls both feeds of a listing concurrently, keeping whichever succeed
async fn harvest_listing(
    context: &CrawlContext,
    listing: ListingId,
) -> (ListingReviews, Vec<ListingFailure>) {
    let (recommended, not_recommended) = tokio::join!(
        crawl_feed(context, &listing, Feed::Recommended),
        crawl_feed(context, &listing, Feed::NotRecommended),
    );

    let mut failures = Vec::new();
    let mut keep = |feed: Feed, result: Result<FeedHarvest, HarvestError>| match result {
        Ok(harvest) => Some(harvest),
        Err(error) => {
            warn!("Failed to crawl {} feed of {}: {}", feed, listing, error);
            failures.push(ListingFailure {
                listing: listing.clone(),
                feed: Some(feed),
                error,
            });
            None
        }
    };

    let recommended = keep(Feed::Recommended, recommended);
    let not_recommended = keep(Feed::NotRecommended, not_recommended);

    (
        ListingReviews {
            listing,
            recommended,
            not_recommended,
        },
        failures,
    )
}
