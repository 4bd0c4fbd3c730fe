//! Review feed crawling for a single listing

use crate::crawler::context::CrawlContext;
use crate::crawler::paginator::{walk, WalkEnd};
use crate::extract::extract_reviews;
use crate::model::{ExtractionIssue, Feed, ListingId, Review};
use crate::HarvestError;
use tracing::info;

/// All reviews collected from one feed of one listing
#[derive(Debug, Clone, PartialEq)]
pub struct FeedHarvest {
    pub feed: Feed,
    pub reviews: Vec<Review>,

    /// Review blocks skipped as malformed
    pub issues: Vec<ExtractionIssue>,

    pub pages: usize,
    pub end: WalkEnd,
}

impl FeedHarvest {
    /// Returns true if the walk stopped at a safety bound
    pub fn is_truncated(&self) -> bool {
        matches!(self.end, WalkEnd::BoundReached { .. })
    }
}

/// Walks one review feed of a listing to exhaustion
pub async fn crawl_feed(
    context: &CrawlContext,
    listing: &ListingId,
    feed: Feed,
) -> Result<FeedHarvest, HarvestError> {
    let template = context.urls.feed(listing, feed)?;
    let selectors = &context.selectors;
    let moderation_message = context.moderation_message.as_str();

    let walked = walk(
        context.fetcher.as_ref(),
        &template,
        context.limits,
        None,
        |page| extract_reviews(page, selectors, moderation_message),
    )
    .await?;

    info!(
        "Collected {} {} reviews for {} from {} pages ({} skipped)",
        walked.items.len(),
        feed,
        listing,
        walked.pages,
        walked.issues.len()
    );

    Ok(FeedHarvest {
        feed,
        reviews: walked.items,
        issues: walked.issues,
        pages: walked.pages,
        end: walked.end,
    })
}

/// Walks the listing's recommended review feed
pub async fn crawl_recommended(
    context: &CrawlContext,
    listing: &ListingId,
) -> Result<FeedHarvest, HarvestError> {
    crawl_feed(context, listing, Feed::Recommended).await
}

/// Walks the listing's not-recommended review feed
pub async fn crawl_not_recommended(
    context: &CrawlContext,
    listing: &ListingId,
) -> Result<FeedHarvest, HarvestError> {
    crawl_feed(context, listing, Feed::NotRecommended).await
}
