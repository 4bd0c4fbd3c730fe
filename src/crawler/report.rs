use crate::crawler::feeds::FeedHarvest;
use crate::model::{Feed, ListingId};
use crate::HarvestError;
use chrono::{DateTime, Utc};

/// Reviews harvested for one listing
///
/// A feed is `None` when its crawl failed; the failure is listed in
/// [`HarvestReport::failures`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingReviews {
    pub listing: ListingId,
    pub recommended: Option<FeedHarvest>,
    pub not_recommended: Option<FeedHarvest>,
}

impl ListingReviews {
    /// The successfully crawled feeds, recommended first
    pub fn feeds(&self) -> impl Iterator<Item = &FeedHarvest> {
        self.recommended.iter().chain(self.not_recommended.iter())
    }

    pub fn review_count(&self) -> usize {
        self.feeds().map(|feed| feed.reviews.len()).sum()
    }
}

/// A feed (or a whole listing task) that could not be crawled
#[derive(Debug)]
pub struct ListingFailure {
    pub listing: ListingId,

    /// `None` if the listing's task failed before either feed completed
    pub feed: Option<Feed>,

    pub error: HarvestError,
}

/// Outcome of a full harvest: partial successes plus per-listing failures
#[derive(Debug)]
pub struct HarvestReport {
    pub query: String,

    /// One entry per discovered listing, in discovery order
    pub listings: Vec<ListingReviews>,

    pub failures: Vec<ListingFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl HarvestReport {
    pub fn review_count(&self) -> usize {
        self.listings.iter().map(ListingReviews::review_count).sum()
    }

    /// Number of review blocks skipped as malformed
    pub fn issue_count(&self) -> usize {
        self.listings
            .iter()
            .flat_map(ListingReviews::feeds)
            .map(|feed| feed.issues.len())
            .sum()
    }

    /// Returns true if every feed was walked to exhaustion without failures
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
            && self
                .listings
                .iter()
                .flat_map(ListingReviews::feeds)
                .all(|feed| !feed.is_truncated())
    }
}
