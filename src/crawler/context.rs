use crate::config::{validate, Config};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::paginator::WalkLimits;
use crate::extract::Selectors;
use crate::url::SiteUrls;
use crate::HarvestError;
use std::sync::Arc;

/// Everything a discovery or feed walk needs, shared read-only across tasks
#[derive(Clone)]
pub struct CrawlContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub urls: SiteUrls,
    pub selectors: Selectors,
    pub limits: WalkLimits,
    pub moderation_message: String,
}

impl CrawlContext {
    /// Validates the configuration and compiles its selector table
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self, HarvestError> {
        validate(config)?;

        Ok(Self {
            fetcher,
            urls: SiteUrls::new(&config.site.base_url)?,
            selectors: Selectors::compile(&config.selectors)?,
            limits: WalkLimits::from(&config.crawler),
            moderation_message: config.site.moderation_message.clone(),
        })
    }
}
