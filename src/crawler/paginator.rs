//! Offset-based feed pagination
//!
//! A feed is walked page by page. Each page's offset is the number of records
//! already accounted for, so the walk advances by what a page actually yielded
//! rather than by a fixed page size. The first empty page ends the walk.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::model::{ExtractionIssue, PageBatch};
use crate::url::OffsetTemplate;
use crate::HarvestError;
use tracing::{debug, warn};

/// Safety bounds for a single feed walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Maximum number of pages fetched
    pub max_pages: usize,

    /// Largest offset that will be requested
    pub max_offset: usize,
}

impl From<&CrawlerConfig> for WalkLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages_per_feed,
            max_offset: config.max_offset,
        }
    }
}

/// Why a walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// An empty page was observed
    Exhausted,

    /// The caller's item target was reached
    Satisfied,

    /// The feed never emptied within the configured bounds
    BoundReached { pages: usize, offset: usize },
}

/// Everything collected from one feed walk
#[derive(Debug, Clone, PartialEq)]
pub struct PageWalk<T> {
    pub items: Vec<T>,

    /// Skipped records; `index` is the record's offset within the feed
    pub issues: Vec<ExtractionIssue>,

    /// Number of pages fetched, the terminating empty page included
    pub pages: usize,

    pub end: WalkEnd,
}

/// Walks a paged feed until an empty page, the item target, or a safety bound
///
/// # Algorithm
///
/// 1. Stop with `BoundReached` if the page or offset bound is hit
/// 2. Fetch `template.at(offset)`; transport errors propagate immediately
/// 3. Convert the body with `page_to_items`
/// 4. Stop with `Exhausted` if the batch is empty
/// 5. Accumulate the batch and advance `offset` by `batch.consumed()`
/// 6. Stop with `Satisfied` once `stop_after` items are accumulated
///
/// # Arguments
///
/// * `fetcher` - Page source
/// * `template` - Feed URL with the offset substitution point
/// * `limits` - Safety bounds against feeds that never empty
/// * `stop_after` - Optional item target
/// * `page_to_items` - Extraction step for one page body
pub async fn walk<T, F>(
    fetcher: &dyn PageFetcher,
    template: &OffsetTemplate,
    limits: WalkLimits,
    stop_after: Option<usize>,
    mut page_to_items: F,
) -> Result<PageWalk<T>, HarvestError>
where
    T: Send,
    F: FnMut(&[u8]) -> PageBatch<T> + Send,
{
    let mut offset = 0usize;
    let mut pages = 0usize;
    let mut items = Vec::new();
    let mut issues = Vec::new();

    loop {
        if pages >= limits.max_pages || offset > limits.max_offset {
            warn!(
                "Feed {} did not terminate within bound (pages={}, offset={})",
                template.at(offset),
                pages,
                offset
            );
            return Ok(PageWalk {
                items,
                issues,
                pages,
                end: WalkEnd::BoundReached { pages, offset },
            });
        }

        let url = template.at(offset);
        debug!("Fetching page at offset {}: {}", offset, url);

        let body = fetcher.fetch(&url).await?;
        pages += 1;

        let batch = page_to_items(&body);
        if batch.is_empty() {
            debug!("Empty page at offset {}, feed exhausted", offset);
            return Ok(PageWalk {
                items,
                issues,
                pages,
                end: WalkEnd::Exhausted,
            });
        }

        let consumed = batch.consumed();
        items.extend(batch.items);
        issues.extend(batch.issues.into_iter().map(|issue| ExtractionIssue {
            index: offset + issue.index,
            ..issue
        }));
        offset += consumed;

        if let Some(target) = stop_after {
            if items.len() >= target {
                debug!("Reached target of {} items at offset {}", target, offset);
                return Ok(PageWalk {
                    items,
                    issues,
                    pages,
                    end: WalkEnd::Satisfied,
                });
            }
        }
    }
}
