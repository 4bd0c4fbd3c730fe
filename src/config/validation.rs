use crate::config::types::{Config, CrawlerConfig, RetryConfig, SiteConfig};
use crate::extract::Selectors;
use crate::ConfigError;
use reqwest::header::HeaderValue;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;

    // A selector that does not compile would fail every page, so reject it early
    Selectors::compile(&config.selectors)
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    Ok(())
}

/// Validates target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use HTTP or HTTPS",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(&config.user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user_agent '{}' is not a valid header value",
            config.user_agent
        )));
    }

    if config.moderation_message.is_empty() {
        return Err(ConfigError::Validation(
            "moderation_message cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_per_feed < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_feed must be >= 1, got {}",
            config.max_pages_per_feed
        )));
    }

    if config.max_concurrent_listings < 1 || config.max_concurrent_listings > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_listings must be between 1 and 32, got {}",
            config.max_concurrent_listings
        )));
    }

    if config.requests_per_second < 1 || config.requests_per_second > 50 {
        return Err(ConfigError::Validation(format!(
            "requests_per_second must be between 1 and 50, got {}",
            config.requests_per_second
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}
