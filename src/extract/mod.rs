//! Page extraction for search and review pages
//!
//! This module turns raw response bodies into typed records:
//! - Review blocks into `Review` records, with moderation filtering
//! - Search result links into `ListingId`s
//!
//! All structural lookups go through the compiled `Selectors` table.

mod listings;
mod reviews;
mod selectors;

pub use listings::extract_listings;
pub use reviews::{extract_reviews, flatten_content};
pub use selectors::{FieldSelector, Selectors};
