use std::fmt;

/// Opaque identifier of one listing: the path segment after `/biz/`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts a listing id from a search result link
    ///
    /// Links carrying a query string are rejected outright (they are ad or
    /// tracking variants of a listing). Otherwise the id is the third
    /// `/`-delimited segment: `/biz/some-place` → `some-place`.
    pub fn from_href(href: &str) -> Option<Self> {
        if href.contains('?') {
            return None;
        }

        href.split('/')
            .nth(2)
            .filter(|segment| !segment.is_empty())
            .map(Self::new)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One of a listing's two independently paginated review streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Recommended,
    NotRecommended,
}

impl Feed {
    /// Path prefix the listing id is appended to
    pub fn path_prefix(&self) -> &'static str {
        match self {
            Self::Recommended => "biz",
            Self::NotRecommended => "not_recommended_reviews",
        }
    }

    /// Query parameter carrying the item offset
    ///
    /// The two feeds do not share a parameter name.
    pub fn offset_param(&self) -> &'static str {
        match self {
            Self::Recommended => "start",
            Self::NotRecommended => "not_recommended_start",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recommended => f.write_str("recommended"),
            Self::NotRecommended => f.write_str("not-recommended"),
        }
    }
}
