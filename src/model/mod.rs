//! Data model for harvested records
//!
//! This module contains:
//! - `Review`, `Rating`, and `Author`: one extracted user review
//! - `ListingId` and `Feed`: what gets crawled
//! - `PageBatch`: everything extracted from a single page

mod listing;
mod review;

pub use listing::{Feed, ListingId};
pub use review::{Author, Rating, Review, UNKNOWN_AUTHOR};

use crate::ExtractError;

/// A record skipped during extraction because a required node was absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionIssue {
    /// Position of the offending record among the page's counted records
    pub index: usize,
    pub error: ExtractError,
}

/// The items extracted from exactly one fetched page
///
/// An empty batch (no items and no skipped records) is the exhaustion
/// signal for pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch<T> {
    pub items: Vec<T>,
    pub issues: Vec<ExtractionIssue>,

    /// Well-formed records read from the page but not emitted (duplicates)
    pub skipped: usize,
}

impl<T> PageBatch<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            issues: Vec::new(),
            skipped: 0,
        }
    }

    /// Returns true if the page yielded nothing at all
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.issues.is_empty() && self.skipped == 0
    }

    /// Number of records the page accounted for, skipped ones included
    ///
    /// This is how far the pagination offset advances past the page.
    pub fn consumed(&self) -> usize {
        self.items.len() + self.issues.len() + self.skipped
    }
}

impl<T> Default for PageBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for PageBatch<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            issues: Vec::new(),
            skipped: 0,
        }
    }
}
