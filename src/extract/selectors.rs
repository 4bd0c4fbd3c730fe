//! Compiled CSS selector table
//!
//! Every structural lookup the extractors perform goes through one named
//! [`FieldSelector`], compiled once from the configured [`SelectorConfig`].
//! When the site's markup changes, only the configuration needs updating.

use crate::config::SelectorConfig;
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Selector};

/// A compiled selector bound to the field it extracts
#[derive(Debug, Clone)]
pub struct FieldSelector {
    field: &'static str,
    source: String,
    selector: Selector,
}

impl FieldSelector {
    pub fn compile(field: &'static str, source: &str) -> ExtractResult<Self> {
        let selector = Selector::parse(source).map_err(|_| ExtractError::InvalidSelector {
            field,
            selector: source.to_string(),
        })?;

        Ok(Self {
            field,
            source: source.to_string(),
            selector,
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// First matching descendant of `scope`, if any
    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(&self.selector).next()
    }

    /// First matching descendant of `scope`, or a structural error naming the field
    pub fn require<'a>(&self, scope: ElementRef<'a>) -> ExtractResult<ElementRef<'a>> {
        self.first(scope).ok_or_else(|| ExtractError::MissingNode {
            field: self.field,
            selector: self.source.clone(),
        })
    }
}

/// All selectors used by the review and listing extractors
#[derive(Debug, Clone)]
pub struct Selectors {
    pub review_container: FieldSelector,
    pub review_content: FieldSelector,
    pub content_paragraph: FieldSelector,
    pub rating: FieldSelector,
    pub rating_attribute: String,
    pub sidebar: FieldSelector,
    pub author_name: FieldSelector,
    pub friend_count: FieldSelector,
    pub review_count: FieldSelector,
    pub listing_link: FieldSelector,
}

impl Selectors {
    /// Compiles the configured selector table
    ///
    /// # Returns
    ///
    /// * `Ok(Selectors)` - Every selector compiled
    /// * `Err(ExtractError::InvalidSelector)` - The first selector that did not
    pub fn compile(config: &SelectorConfig) -> ExtractResult<Self> {
        if config.rating_attribute.trim().is_empty() {
            return Err(ExtractError::InvalidSelector {
                field: "rating_attribute",
                selector: config.rating_attribute.clone(),
            });
        }

        Ok(Self {
            review_container: FieldSelector::compile(
                "review_container",
                &config.review_container,
            )?,
            review_content: FieldSelector::compile("review_content", &config.review_content)?,
            content_paragraph: FieldSelector::compile(
                "content_paragraph",
                &config.content_paragraph,
            )?,
            rating: FieldSelector::compile("rating", &config.rating)?,
            rating_attribute: config.rating_attribute.clone(),
            sidebar: FieldSelector::compile("sidebar", &config.sidebar)?,
            author_name: FieldSelector::compile("author_name", &config.author_name)?,
            friend_count: FieldSelector::compile("friend_count", &config.friend_count)?,
            review_count: FieldSelector::compile("review_count", &config.review_count)?,
            listing_link: FieldSelector::compile("listing_link", &config.listing_link)?,
        })
    }
}
