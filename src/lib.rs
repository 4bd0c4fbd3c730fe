//! Review-Ripple: a paginated review harvester
//!
//! This crate discovers listings for a search query on a review site and walks
//! every listing's recommended and not-recommended review feeds, turning each
//! page into typed review records.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod url;

use thiserror::Error;

/// Main error type for Review-Ripple operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Base URL cannot carry path segments: {base}")]
    UrlBase { base: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failures surfaced by a page fetch
///
/// Messages are kept as strings so the error can be cloned into reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    /// Builds a transport error from a reqwest failure
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            Self::Timeout { url }
        } else if err.is_connect() {
            Self::Connect {
                url,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                url,
                status: status.as_u16(),
            }
        } else if err.is_body() || err.is_decode() {
            Self::Body {
                url,
                message: err.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: err.to_string(),
            }
        }
    }

    /// Returns true if the request is worth retrying
    ///
    /// | Condition | Retry |
    /// |-----------|-------|
    /// | Timeout | yes |
    /// | HTTP 5xx | yes |
    /// | HTTP 429 | yes |
    /// | Body read failure | yes |
    /// | Connection refused | no |
    /// | Other HTTP 4xx | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Body { .. } => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Connect { .. } | Self::Request { .. } => false,
        }
    }
}

/// Structural extraction errors: an expected node or attribute is absent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Invalid selector for {field}: `{selector}`")]
    InvalidSelector { field: &'static str, selector: String },

    #[error("Missing {field} node (selector `{selector}`)")]
    MissingNode { field: &'static str, selector: String },

    #[error("Missing `{attribute}` attribute on {field} node")]
    MissingAttribute {
        field: &'static str,
        attribute: String,
    },

    #[error("Empty {field} value")]
    EmptyValue { field: &'static str },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Review-Ripple operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{HarvestReport, Harvester, HttpFetcher, PageFetcher};
pub use model::{Author, Feed, ListingId, PageBatch, Rating, Review};
