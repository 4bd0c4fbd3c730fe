use std::fmt;

/// Display name used when a review block carries no author name node
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A star rating as published by the site
///
/// The raw token (e.g. `"4.0"` from `"4.0 star rating"`) is preserved exactly;
/// [`Rating::value`] parses it on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    raw: String,
}

impl Rating {
    /// Builds a rating from a descriptive attribute such as `"4.0 star rating"`
    ///
    /// Keeps the first whitespace-delimited token. Returns `None` when the
    /// description is blank.
    pub fn from_description(description: &str) -> Option<Self> {
        description.split_whitespace().next().map(|token| Self {
            raw: token.to_string(),
        })
    }

    /// The raw rating token
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The rating as a number, if the raw token is numeric
    pub fn value(&self) -> Option<f32> {
        self.raw.parse().ok()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The author of a review and their social counts
///
/// Counts are kept as the raw text shown on the page ("1,204").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub friend_count: String,
    pub review_count: String,
}

impl Author {
    /// Number of friends, if the raw count is numeric
    pub fn friends(&self) -> Option<u32> {
        parse_count(&self.friend_count)
    }

    /// Number of reviews written, if the raw count is numeric
    pub fn reviews(&self) -> Option<u32> {
        parse_count(&self.review_count)
    }
}

/// Parses a count such as "1,204" ignoring thousands separators
fn parse_count(raw: &str) -> Option<u32> {
    let digits: String = raw.trim().chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

/// One user review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub content: String,
    pub rating: Rating,
    pub author: Author,
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({} friends, {} reviews): {}",
            self.rating,
            self.author.name,
            self.author.friend_count,
            self.author.review_count,
            self.content
        )
    }
}
