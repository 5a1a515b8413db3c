//! DuckDuckGo backend against a mocked service.

use imgrab::source::{DuckDuckGo, ImageSource, RateLimitBackoff, SearchQuery};
use imgrab::{Engine, Error};

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PAGE: &str = r#"<html><script>vqd="4-31415926535";</script></html>"#;

fn hit(n: usize, width: u32, height: u32) -> Value {
    json!({
        "title": format!("cat {}", n),
        "image": format!("https://images.example.com/{}.jpg", n),
        "thumbnail": format!("https://thumbs.example.com/{}.jpg", n),
        "url": format!("https://example.com/page/{}", n),
        "width": width,
        "height": height,
    })
}

fn fast_backoff() -> RateLimitBackoff {
    RateLimitBackoff {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(5),
        max_retries: 3,
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "cats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN_PAGE))
        .mount(server)
        .await;
}

async fn backend(server: &MockServer) -> DuckDuckGo {
    DuckDuckGo::with_base_url(&server.uri())
        .unwrap()
        .backoff(fast_backoff())
        .timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_fetch_filters_by_size_and_stops_at_limit() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(query_param("vqd", "4-31415926535"))
        .and(query_param("o", "json"))
        .and(query_param("p", "-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(0, 320, 200), hit(1, 1024, 768), hit(2, 800, 100), hit(3, 900, 900), hit(4, 1200, 1200)],
        })))
        .mount(&server)
        .await;

    let query = SearchQuery::new("cats").limit(2).min_size(500, 500);
    let results = backend(&server).await.fetch(&query).await.unwrap();

    let urls: Vec<_> = results.iter().map(|r| r.text("image").unwrap()).collect();
    assert_eq!(
        urls,
        [
            "https://images.example.com/1.jpg",
            "https://images.example.com/3.jpg"
        ]
    );
}

#[tokio::test]
async fn test_requests_carry_duckduckgo_referer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("referer", "https://duckduckgo.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN_PAGE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(header("referer", "https://duckduckgo.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(0, 10, 10)],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats").limit(1))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_fetch_follows_next_cursor() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    // The more specific mock is mounted first so it wins for page two.
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(query_param("s", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(3, 10, 10), hit(4, 10, 10)],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(0, 10, 10), hit(1, 10, 10), hit(2, 10, 10)],
            "next": "i.js?q=cats&o=json&p=-1&s=3&u=bing&f=,,,&l=wt-wt",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats").limit(5))
        .await
        .unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[4].text("image"), Some("https://images.example.com/4.jpg"));
}

#[tokio::test]
async fn test_fetch_stops_after_raw_budget() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    let page: Vec<Value> = (0..10).map(|n| hit(n, 10, 10)).collect();
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": page,
            "next": "i.js?q=cats&s=10",
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Nothing passes the filter, and a limit of 1 allows only 10 raw hits.
    let query = SearchQuery::new("cats").limit(1).min_size(5000, 5000);
    let results = backend(&server).await.fetch(&query).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_fetch_drops_duplicate_images() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(0, 10, 10), hit(0, 10, 10), hit(1, 10, 10)],
        })))
        .mount(&server)
        .await;

    let results = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats").limit(10))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_persistent_rate_limit_is_reported_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(4)
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats").limit(5))
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert!(matches!(err, Error::RateLimited { engine: Engine::Ddg, .. }));
}

#[tokio::test]
async fn test_transient_rate_limit_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/i.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(0, 10, 10)],
        })))
        .mount(&server)
        .await;

    let results = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats").limit(5))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Discovery { engine: Engine::Ddg, .. }));
}

#[tokio::test]
async fn test_missing_token_is_discovery_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no token</html>"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Discovery { .. }));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_zero_limit_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let results = backend(&server)
        .await
        .fetch(&SearchQuery::new("cats").limit(0))
        .await
        .unwrap();
    assert!(results.is_empty());
}
