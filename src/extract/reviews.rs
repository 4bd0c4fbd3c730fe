//! Review extraction
//!
//! Converts one review feed page into [`Review`] records. Blocks carrying the
//! moderation placeholder are dropped before any other field is read; blocks
//! missing a required node are skipped and reported as issues so the rest of
//! the page survives.

use crate::extract::selectors::{FieldSelector, Selectors};
use crate::model::{Author, ExtractionIssue, PageBatch, Rating, Review, UNKNOWN_AUTHOR};
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

/// Extracts every review on a feed page, in document order
///
/// # Arguments
///
/// * `page` - Raw response body
/// * `selectors` - Compiled selector table
/// * `moderation_message` - Content that marks a removed review
///
/// # Returns
///
/// A batch holding the extracted reviews and one issue per malformed block.
/// A page with no review containers yields an empty batch.
pub fn extract_reviews(
    page: &[u8],
    selectors: &Selectors,
    moderation_message: &str,
) -> PageBatch<Review> {
    let html = String::from_utf8_lossy(page);
    let document = Html::parse_document(&html);
    let mut batch = PageBatch::new();

    // Position among counted records; moderated blocks are not counted
    let mut index = 0;
    for container in document.select(selectors.review_container.selector()) {
        match extract_review(container, selectors, moderation_message) {
            Ok(Some(review)) => {
                debug!(
                    "Got review {}: rating={}, author={}",
                    index, review.rating, review.author.name
                );
                batch.items.push(review);
                index += 1;
            }
            Ok(None) => debug!("Review after {} removed by moderation, skipping", index),
            Err(error) => {
                warn!("Skipping malformed review {}: {}", index, error);
                batch.issues.push(ExtractionIssue { index, error });
                index += 1;
            }
        }
    }

    batch
}

/// Extracts a single review block
///
/// Returns `Ok(None)` for moderated reviews.
fn extract_review(
    container: ElementRef<'_>,
    selectors: &Selectors,
    moderation_message: &str,
) -> ExtractResult<Option<Review>> {
    let content_node = selectors.review_content.require(container)?;
    let paragraph = selectors.content_paragraph.require(content_node)?;
    let content = flatten_content(paragraph);

    // Moderated blocks have no reliable rating/author markup
    if content == moderation_message {
        return Ok(None);
    }

    let rating = extract_rating(content_node, selectors)?;
    let author = extract_author(container, selectors)?;

    Ok(Some(Review {
        content,
        rating,
        author,
    }))
}

fn extract_rating(content_node: ElementRef<'_>, selectors: &Selectors) -> ExtractResult<Rating> {
    let stars = selectors.rating.require(content_node)?;
    let description = stars
        .value()
        .attr(&selectors.rating_attribute)
        .ok_or_else(|| ExtractError::MissingAttribute {
            field: selectors.rating.field(),
            attribute: selectors.rating_attribute.clone(),
        })?;

    Rating::from_description(description).ok_or(ExtractError::EmptyValue {
        field: selectors.rating.field(),
    })
}

/// Reads the author block
///
/// The display name falls back to [`UNKNOWN_AUTHOR`]; both counts are required.
fn extract_author(container: ElementRef<'_>, selectors: &Selectors) -> ExtractResult<Author> {
    let sidebar = selectors.sidebar.require(container)?;

    let name = selectors
        .author_name
        .first(sidebar)
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let friend_count = first_fragment(sidebar, &selectors.friend_count)?;
    let review_count = first_fragment(sidebar, &selectors.review_count)?;

    Ok(Author {
        name,
        friend_count,
        review_count,
    })
}

/// First text fragment of the node matched by `selector`
fn first_fragment(
    scope: ElementRef<'_>,
    selector: &FieldSelector,
) -> ExtractResult<String> {
    selector
        .require(scope)?
        .text()
        .map(str::trim)
        .find(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .ok_or(ExtractError::EmptyValue {
            field: selector.field(),
        })
}

/// Concatenates a paragraph's children into plain text
///
/// Inline markup is flattened to its text; `<br>` becomes a single space and
/// consecutive breaks collapse into one.
pub fn flatten_content(paragraph: ElementRef<'_>) -> String {
    let mut content = String::new();
    append_children(paragraph, &mut content);
    content
}

fn append_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if child_element.value().name() == "br" {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            } else {
                append_children(child_element, out);
            }
        }
    }
}
