//! Listing discovery from search result pages

use crate::crawler::context::CrawlContext;
use crate::crawler::paginator::walk;
use crate::extract::extract_listings;
use crate::model::ListingId;
use crate::HarvestError;
use std::collections::HashSet;
use tracing::{debug, info};

/// Discovers up to `count` listing ids for a search query
///
/// Search pages are walked until one comes back empty or `count` distinct ids
/// have been seen. Repeated ids are dropped as each page is read, so only new
/// ids count toward the target; they still advance the search offset. The
/// result keeps discovery order and is truncated to `count`. Fewer are
/// returned only if the search runs dry first. A `count` of zero returns
/// immediately without fetching.
pub async fn discover(
    context: &CrawlContext,
    query: &str,
    count: usize,
) -> Result<Vec<ListingId>, HarvestError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let template = context.urls.search(query)?;
    let selectors = &context.selectors;
    let mut seen = HashSet::new();

    let walked = walk(
        context.fetcher.as_ref(),
        &template,
        context.limits,
        Some(count),
        move |page| {
            let mut batch = extract_listings(page, selectors);
            let found = batch.items.len();
            batch.items.retain(|id| seen.insert(id.clone()));
            batch.skipped += found - batch.items.len();
            if batch.skipped > 0 {
                debug!("Dropped {} already discovered listings", batch.skipped);
            }
            batch
        },
    )
    .await?;

    let listings: Vec<ListingId> = walked.items.into_iter().take(count).collect();

    info!(
        "Discovered {} listings for '{}' across {} search pages ({:?})",
        listings.len(),
        query,
        walked.pages,
        walked.end
    );

    Ok(listings)
}
