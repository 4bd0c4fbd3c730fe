//! Listing extraction from search result pages

use crate::extract::selectors::Selectors;
use crate::model::{ExtractionIssue, ListingId, PageBatch};
use crate::ExtractError;
use scraper::Html;
use tracing::{debug, warn};

/// Extracts listing ids from one search results page
///
/// # Link Rules
///
/// **Include:** anchors matching the listing-link signature whose `href`
/// has a third `/`-delimited segment (`/biz/<id>`).
///
/// **Exclude:** any `href` containing `?`. These are ad or tracking variants
/// and are dropped outright, not merged with the clean link.
///
/// Anchors with no `href`, or no id segment, are reported as issues.
pub fn extract_listings(page: &[u8], selectors: &Selectors) -> PageBatch<ListingId> {
    let html = String::from_utf8_lossy(page);
    let document = Html::parse_document(&html);
    let mut batch = PageBatch::new();

    for (index, link) in document
        .select(selectors.listing_link.selector())
        .enumerate()
    {
        let Some(href) = link.value().attr("href") else {
            warn!("Listing link {} has no href", index);
            batch.issues.push(ExtractionIssue {
                index,
                error: ExtractError::MissingAttribute {
                    field: selectors.listing_link.field(),
                    attribute: "href".to_string(),
                },
            });
            continue;
        };

        if href.contains('?') {
            debug!("Skipping query-bearing listing link {}", href);
            continue;
        }

        match ListingId::from_href(href) {
            Some(id) => batch.items.push(id),
            None => {
                warn!("Listing link {} has no id segment: {}", index, href);
                batch.issues.push(ExtractionIssue {
                    index,
                    error: ExtractError::EmptyValue { field: "listing_id" },
                });
            }
        }
    }

    batch
}
