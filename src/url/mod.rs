//! URL handling module for Review-Ripple
//!
//! This module builds the three URL families the harvester requests:
//! search result pages, recommended review pages, and not-recommended
//! review pages. Each is exposed as an [`OffsetTemplate`].

mod template;

pub use template::OffsetTemplate;

use crate::model::{Feed, ListingId};
use crate::HarvestError;
use url::Url;

/// URL builder rooted at the site's base URL
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    /// Creates a URL builder from the configured base URL
    ///
    /// # Returns
    ///
    /// * `Ok(SiteUrls)` - The base URL can carry path segments
    /// * `Err(HarvestError)` - The base URL is malformed or opaque (e.g. `mailto:`)
    pub fn new(base_url: &str) -> Result<Self, HarvestError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(HarvestError::UrlBase {
                base: base_url.to_string(),
            });
        }
        Ok(Self { base })
    }

    /// Search results: `<base>/search?find_desc=&find_loc=<query>&start=<offset>`
    pub fn search(&self, query: &str) -> Result<OffsetTemplate, HarvestError> {
        let mut url = self.with_segments(&["search"])?;
        url.query_pairs_mut()
            .append_pair("find_desc", "")
            .append_pair("find_loc", query);
        Ok(OffsetTemplate::new(url, "start"))
    }

    /// One listing's review feed
    ///
    /// * Recommended: `<base>/biz/<id>?start=<offset>`
    /// * Not recommended: `<base>/not_recommended_reviews/<id>?not_recommended_start=<offset>`
    pub fn feed(&self, listing: &ListingId, feed: Feed) -> Result<OffsetTemplate, HarvestError> {
        let url = self.with_segments(&[feed.path_prefix(), listing.as_str()])?;
        Ok(OffsetTemplate::new(url, feed.offset_param()))
    }

    /// Appends path segments to the base, dropping any query or fragment
    fn with_segments(&self, segments: &[&str]) -> Result<Url, HarvestError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| HarvestError::UrlBase {
                base: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
