//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and exercise
//! discovery, feed pagination, retries, and failure isolation end-to-end.

use review_ripple::config::Config;
use review_ripple::crawler::{
    crawl_not_recommended, crawl_recommended, discover, Harvester, WalkEnd,
};
use review_ripple::model::{Feed, ListingId};
use review_ripple::{HarvestError, TransportError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LINK_CLASS: &str = "lemon--a__373c0__IEZFH link__373c0__29943 \
                          link-color--blue-dark__373c0__1mhJo \
                          link-size--inherit__373c0__2JXk5";

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.user_agent = "ReviewRippleTest/1.0".to_string();
    config.crawler.requests_per_second = 50;
    config.crawler.request_timeout_secs = 5;
    config.retry.max_retries = 2;
    config.retry.min_delay_ms = 1;
    config.retry.max_delay_ms = 5;
    config
}

/// A review feed page holding one block per `(content, rating, author)`
fn review_page(reviews: &[(&str, &str, &str)]) -> String {
    let blocks: String = reviews
        .iter()
        .map(|(content, rating, author)| {
            format!(
                r#"<div class="review review--with-sidebar">
                    <div class="review-sidebar">
                        <a class="user-display-name" href="/user">{author}</a>
                        <ul>
                            <li class="friend-count"><b>7</b> friends</li>
                            <li class="review-count"><b>21</b> reviews</li>
                        </ul>
                    </div>
                    <div class="review-content">
                        <div class="i-stars" title="{rating} star rating"></div>
                        <p>{content}</p>
                    </div>
                </div>"#
            )
        })
        .collect();

    format!("<html><body><div class=\"reviews\">{}</div></body></html>", blocks)
}

fn empty_page() -> String {
    "<html><body><p>No more reviews</p></body></html>".to_string()
}

/// A search results page linking to each href with the listing-link style
fn search_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a class="{LINK_CLASS}" href="{href}">Listing</a></li>"#))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", links)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_feed_page(server: &MockServer, feed: Feed, listing: &str, offset: usize, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/{}", feed.path_prefix(), listing)))
        .and(query_param(feed.offset_param(), offset.to_string()))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_search_page(server: &MockServer, query: &str, offset: usize, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("find_loc", query))
        .and(query_param("start", offset.to_string()))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recommended_feed_walks_to_exhaustion() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_feed_page(
        &mock_server,
        Feed::Recommended,
        "cafe",
        0,
        review_page(&[("Great food<br/>Will return", "4.0", "Ada"), ("Slow service", "2.0", "Ben")]),
    )
    .await;
    mount_feed_page(
        &mock_server,
        Feed::Recommended,
        "cafe",
        2,
        review_page(&[("Lovely brunch", "5.0", "Cy")]),
    )
    .await;
    mount_feed_page(&mock_server, Feed::Recommended, "cafe", 3, empty_page()).await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = crawl_recommended(harvester.context(), &ListingId::new("cafe"))
        .await
        .expect("Feed crawl failed");

    let contents: Vec<_> = harvest.reviews.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["Great food Will return", "Slow service", "Lovely brunch"]);
    assert_eq!(harvest.pages, 3);
    assert_eq!(harvest.end, WalkEnd::Exhausted);

    let first = &harvest.reviews[0];
    assert_eq!(first.rating.raw(), "4.0");
    assert_eq!(first.author.name, "Ada");
    assert_eq!(first.author.friends(), Some(7));
    assert_eq!(first.author.reviews(), Some(21));
}

#[tokio::test]
async fn test_not_recommended_feed_uses_its_own_parameter() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_feed_page(
        &mock_server,
        Feed::NotRecommended,
        "cafe",
        0,
        review_page(&[("Suspicious praise", "5.0", "Dee")]),
    )
    .await;
    mount_feed_page(&mock_server, Feed::NotRecommended, "cafe", 1, empty_page()).await;

    // The recommended endpoint must never be touched
    Mock::given(method("GET"))
        .and(path("/biz/cafe"))
        .respond_with(html(empty_page()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = crawl_not_recommended(harvester.context(), &ListingId::new("cafe"))
        .await
        .expect("Feed crawl failed");

    assert_eq!(harvest.feed, Feed::NotRecommended);
    assert_eq!(harvest.reviews.len(), 1);
    assert_eq!(harvest.reviews[0].content, "Suspicious praise");
}

#[tokio::test]
async fn test_discovery_skips_query_links() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_search_page(
        &mock_server,
        "London",
        0,
        search_page(&[
            "/biz/alpha",
            "/biz/alpha?osq=Pubs",
            "/biz/beta",
            "/adredir?ad_business_id=zzz",
            "/biz/gamma",
        ]),
    )
    .await;
    mount_search_page(&mock_server, "London", 3, search_page(&[])).await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let listings = discover(harvester.context(), "London", 10)
        .await
        .expect("Discovery failed");

    assert_eq!(
        listings,
        vec![
            ListingId::new("alpha"),
            ListingId::new("beta"),
            ListingId::new("gamma"),
        ]
    );
}

#[tokio::test]
async fn test_discovery_stops_at_count() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_search_page(
        &mock_server,
        "Dublin",
        0,
        search_page(&["/biz/one", "/biz/two", "/biz/three"]),
    )
    .await;

    // Count is already satisfied by the first page
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("start", "3"))
        .respond_with(html(search_page(&["/biz/four"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let listings = harvester.discover("Dublin", 2).await.expect("Discovery failed");

    assert_eq!(listings, vec![ListingId::new("one"), ListingId::new("two")]);
}

#[tokio::test]
async fn test_discovery_deduplicates_across_pages() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_search_page(&mock_server, "Cork", 0, search_page(&["/biz/one", "/biz/two"])).await;
    mount_search_page(&mock_server, "Cork", 2, search_page(&["/biz/two", "/biz/three"])).await;
    mount_search_page(&mock_server, "Cork", 4, search_page(&[])).await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let listings = harvester.discover("Cork", 10).await.expect("Discovery failed");

    assert_eq!(
        listings,
        vec![
            ListingId::new("one"),
            ListingId::new("two"),
            ListingId::new("three"),
        ]
    );
}

#[tokio::test]
async fn test_discovery_repeats_do_not_count_toward_target() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_search_page(
        &mock_server,
        "Bath",
        0,
        search_page(&["/biz/one", "/biz/one", "/biz/two"]),
    )
    .await;

    // The repeat still advances the offset past all three links
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("find_loc", "Bath"))
        .and(query_param("start", "3"))
        .respond_with(html(search_page(&["/biz/three"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_search_page(&mock_server, "Bath", 4, search_page(&[])).await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let listings = harvester.discover("Bath", 3).await.expect("Discovery failed");

    assert_eq!(
        listings,
        vec![
            ListingId::new("one"),
            ListingId::new("two"),
            ListingId::new("three"),
        ]
    );
}

#[tokio::test]
async fn test_discovery_with_zero_count_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(html(search_page(&["/biz/one"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let listings = harvester.discover("Galway", 0).await.expect("Discovery failed");

    assert!(listings.is_empty());
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/biz/flaky"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_feed_page(
        &mock_server,
        Feed::Recommended,
        "flaky",
        0,
        review_page(&[("Worth the wait", "4.0", "Eve")]),
    )
    .await;
    mount_feed_page(&mock_server, Feed::Recommended, "flaky", 1, empty_page()).await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = crawl_recommended(harvester.context(), &ListingId::new("flaky"))
        .await
        .expect("Retry should have recovered");

    assert_eq!(harvest.reviews.len(), 1);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/biz/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let result = crawl_recommended(harvester.context(), &ListingId::new("gone")).await;

    assert!(matches!(
        result,
        Err(HarvestError::Transport(TransportError::Status { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/biz/cafe"))
        .and(header("user-agent", "ReviewRippleTest/1.0"))
        .respond_with(html(empty_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = crawl_recommended(harvester.context(), &ListingId::new("cafe"))
        .await
        .expect("Feed crawl failed");

    assert!(harvest.reviews.is_empty());
    assert_eq!(harvest.pages, 1);
}

#[tokio::test]
async fn test_endless_feed_is_bounded() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.crawler.max_pages_per_feed = 3;

    // Every offset returns the same non-empty page
    Mock::given(method("GET"))
        .and(path("/biz/loop"))
        .respond_with(html(review_page(&[("Again", "3.0", "Fay")])))
        .expect(3)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let harvest = crawl_recommended(harvester.context(), &ListingId::new("loop"))
        .await
        .expect("Bounded walk should not error");

    assert_eq!(harvest.reviews.len(), 3);
    assert!(harvest.is_truncated());
    assert_eq!(harvest.end, WalkEnd::BoundReached { pages: 3, offset: 3 });
}

#[tokio::test]
async fn test_full_harvest_isolates_listing_failures() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_search_page(&mock_server, "Leeds", 0, search_page(&["/biz/good", "/biz/bad"])).await;
    mount_search_page(&mock_server, "Leeds", 2, search_page(&[])).await;

    // good: both feeds succeed
    mount_feed_page(
        &mock_server,
        Feed::Recommended,
        "good",
        0,
        review_page(&[("Superb", "5.0", "Gus"), ("Fine", "3.0", "Hal")]),
    )
    .await;
    mount_feed_page(&mock_server, Feed::Recommended, "good", 2, empty_page()).await;
    mount_feed_page(
        &mock_server,
        Feed::NotRecommended,
        "good",
        0,
        review_page(&[("Filtered", "1.0", "Ivy")]),
    )
    .await;
    mount_feed_page(&mock_server, Feed::NotRecommended, "good", 1, empty_page()).await;

    // bad: recommended feed is gone, not-recommended still works
    Mock::given(method("GET"))
        .and(path("/biz/bad"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_feed_page(
        &mock_server,
        Feed::NotRecommended,
        "bad",
        0,
        review_page(&[("Hidden gem", "4.0", "Jon")]),
    )
    .await;
    mount_feed_page(&mock_server, Feed::NotRecommended, "bad", 1, empty_page()).await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let report = harvester.harvest("Leeds", 5).await.expect("Harvest failed");

    assert_eq!(report.query, "Leeds");
    assert_eq!(report.listings.len(), 2);
    assert_eq!(report.listings[0].listing, ListingId::new("good"));
    assert_eq!(report.listings[1].listing, ListingId::new("bad"));

    let good = &report.listings[0];
    assert_eq!(good.recommended.as_ref().map(|f| f.reviews.len()), Some(2));
    assert_eq!(good.not_recommended.as_ref().map(|f| f.reviews.len()), Some(1));

    let bad = &report.listings[1];
    assert!(bad.recommended.is_none());
    assert_eq!(bad.not_recommended.as_ref().map(|f| f.reviews.len()), Some(1));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].listing, ListingId::new("bad"));
    assert_eq!(report.failures[0].feed, Some(Feed::Recommended));

    assert_eq!(report.review_count(), 4);
    assert!(!report.is_complete());
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_harvest_fails_when_discovery_fails() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(&config).expect("Failed to create harvester");
    let result = harvester.harvest("Paris", 3).await;

    assert!(matches!(
        result,
        Err(HarvestError::Transport(TransportError::Status { status: 403, .. }))
    ));
}
