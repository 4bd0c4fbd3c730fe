use serde::Deserialize;

/// Desktop browser identification; the site serves degraded markup without it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.77 Safari/537.36";

/// Placeholder the platform substitutes for reviews removed by moderation
pub const DEFAULT_MODERATION_MESSAGE: &str =
    "This review has been removed for violating our Terms of Service";

pub const DEFAULT_BASE_URL: &str = "https://www.yelp.ie/";

/// Main configuration structure for Review-Ripple
///
/// Every section falls back to its defaults, so an empty file is a valid
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub retry: RetryConfig,
    pub selectors: SelectorConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Root URL every request path is resolved against
    pub base_url: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Review body text that marks a moderated (removed) review
    pub moderation_message: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            moderation_message: DEFAULT_MODERATION_MESSAGE.to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched from a single feed
    pub max_pages_per_feed: usize,

    /// Largest offset a feed walk will request
    pub max_offset: usize,

    /// Maximum number of listings harvested at the same time
    pub max_concurrent_listings: usize,

    /// Global request budget shared by every fetch
    pub requests_per_second: u32,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_feed: 500,
            max_offset: 20_000,
            max_concurrent_listings: 4,
            requests_per_second: 2,
            request_timeout_secs: 30,
        }
    }
}

/// Backoff policy for retryable transport failures
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Retries after the first attempt (0 disables retrying)
    pub max_retries: usize,

    /// First backoff delay (milliseconds)
    pub min_delay_ms: u64,

    /// Backoff ceiling (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

/// Declarative CSS selector table, one entry per extracted field
///
/// Update these when the site's markup changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    pub review_container: String,
    pub review_content: String,
    pub content_paragraph: String,
    pub rating: String,
    /// Attribute on the rating node holding text such as "4.0 star rating"
    pub rating_attribute: String,
    pub sidebar: String,
    pub author_name: String,
    pub friend_count: String,
    pub review_count: String,
    /// Composite style-class signature of listing links on search pages
    pub listing_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            review_container: "div.review.review--with-sidebar".to_string(),
            review_content: "div.review-content".to_string(),
            content_paragraph: "p".to_string(),
            rating: "div.i-stars".to_string(),
            rating_attribute: "title".to_string(),
            sidebar: "div.review-sidebar".to_string(),
            author_name: ".user-display-name".to_string(),
            friend_count: "li.friend-count b".to_string(),
            review_count: "li.review-count b".to_string(),
            listing_link: ".lemon--a__373c0__IEZFH.link__373c0__29943\
                           .link-color--blue-dark__373c0__1mhJo\
                           .link-size--inherit__373c0__2JXk5"
                .to_string(),
        }
    }
}
