use url::Url;

/// A paged feed URL with a single substitution point for the item offset
///
/// The offset is appended as the last query parameter, after any fixed
/// parameters already carried by the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTemplate {
    url: Url,
    offset_param: &'static str,
}

impl OffsetTemplate {
    pub fn new(url: Url, offset_param: &'static str) -> Self {
        Self { url, offset_param }
    }

    /// Renders the URL for the page starting at `offset`
    pub fn at(&self, offset: usize) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(self.offset_param, &offset.to_string());
        url
    }
}
