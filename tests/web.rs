//! Server and transport tests
//!
//! Routes are exercised in-process with `oneshot`; the HTTP transport is
//! exercised against a server bound to an ephemeral port.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use websearch_rs::engines::SearchEngine;
use websearch_rs::frontend::{HttpTransport, LocalTransport, SearchFrontend, Transport};
use websearch_rs::search::{
    SearchError, SearchListener, SearchPage, SearchRequest, SearchResult, SearchResults,
};
use websearch_rs::web::{create_router, AppState};

/// Engine echoing the query back as the title of a single result
struct EchoEngine;

#[async_trait]
impl SearchEngine for EchoEngine {
    fn name(&self) -> &str {
        "echo"
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        // Longer queries answer sooner, so concurrent requests finish out of order
        let delay = 50u64.saturating_sub(request.query.len() as u64 * 5);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(SearchPage::new(200, request.query.clone(), "echo://"))
    }

    fn extract(&self, request: &SearchRequest, page: SearchPage) -> SearchResults {
        let mut results: SearchResults = (0..3)
            .map(|i| SearchResult::new(page.html.clone(), i.to_string(), page.url.clone()))
            .collect();
        if let Some(limit) = request.num_results {
            results.truncate(limit);
        }
        results
    }
}

/// Engine whose upstream always answers 503
struct UnavailableEngine;

#[async_trait]
impl SearchEngine for UnavailableEngine {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn fetch(&self, _request: &SearchRequest) -> Result<SearchPage, SearchError> {
        Err(unavailable())
    }

    fn extract(&self, _request: &SearchRequest, _page: SearchPage) -> SearchResults {
        SearchResults::new()
    }
}

fn unavailable() -> SearchError {
    SearchError::Fetch {
        status: 503,
        reason: "Service Unavailable".to_string(),
    }
}

fn listener() -> SearchListener {
    let mut listener = SearchListener::default();
    listener.register("Echo", Arc::new(EchoEngine));
    listener.register("Down", Arc::new(UnavailableEngine));
    listener
}

fn app() -> axum::Router {
    create_router(AppState::new(listener()))
}

fn post_search(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_search_route_returns_results() {
    let response = app()
        .oneshot(post_search(serde_json::json!({
            "query": "hello",
            "backend": "Echo",
            "numResults": 2
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let results: SearchResults = serde_json::from_value(body).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.results()[0], SearchResult::new("hello", "0", "echo://"));
    assert_eq!(results.error(), None);
}

#[tokio::test]
async fn test_search_route_ignores_unaddressed_messages() {
    let response = app()
        .oneshot(post_search(serde_json::json!({ "query": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app()
        .oneshot(post_search(serde_json::json!({ "kind": "toggle-web-access" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_search_route_unknown_backend() {
    let response = app()
        .oneshot(post_search(serde_json::json!({
            "query": "hello",
            "backend": "Nope"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Unknown backend: Nope");
    assert_eq!(body["results"], serde_json::json!([]));
}

#[tokio::test]
async fn test_search_route_empty_query() {
    let response = app()
        .oneshot(post_search(serde_json::json!({
            "query": "   ",
            "backend": "Echo"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_route_malformed_request() {
    let response = app()
        .oneshot(post_search(serde_json::json!({
            "query": "hello",
            "backend": "Echo",
            "numResults": -1
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["cause"]["kind"], "invalid_request");
}

#[tokio::test]
async fn test_search_route_upstream_failure() {
    let response = app()
        .oneshot(post_search(serde_json::json!({
            "query": "hello",
            "backend": "Down"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch: 503 Service Unavailable");
    assert_eq!(body["cause"]["kind"], "fetch");
}

#[tokio::test]
async fn test_engines_route() {
    let response = app()
        .oneshot(Request::builder().uri("/engines").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["engines"], serde_json::json!(["Down", "Echo"]));
}

#[tokio::test]
async fn test_health_route() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], websearch_rs::VERSION);
}

#[tokio::test]
async fn test_http_transport_round_trip() {
    let tcp = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(tcp, app()).await.unwrap();
    });

    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&format!("http://{}/", addr)).unwrap());

    let results = SearchFrontend::new("Echo", transport.clone())
        .search(SearchRequest::new("over the wire").with_num_results(1))
        .await;
    assert_eq!(results.len(), 1);
    assert_eq!(results.results()[0].title, "over the wire");

    let results = SearchFrontend::new("Missing", transport.clone())
        .search(SearchRequest::new("over the wire"))
        .await;
    assert!(results.is_empty());
    assert_eq!(results.to_string(), "Error: Unknown backend: Missing");

    let failed = transport
        .send(SearchRequest::new("over the wire").with_backend("Down"))
        .await;
    assert_eq!(failed, Err(unavailable()));

    let empty = transport
        .send(SearchRequest::new(" ").with_backend("Echo"))
        .await;
    assert!(matches!(empty, Err(SearchError::InvalidRequest(_))));

    let unaddressed = transport.send(SearchRequest::new("over the wire")).await;
    assert_eq!(unaddressed, Err(SearchError::NotHandled));
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_results() {
    let transport: Arc<dyn Transport> = Arc::new(LocalTransport::new(Arc::new(listener())));
    let frontend = SearchFrontend::new("Echo", transport);

    let queries: Vec<String> = (0..10).map(|i| "q".repeat(i + 1)).collect();
    let searches = queries
        .iter()
        .map(|q| frontend.search(SearchRequest::new(q.clone())));
    let answers = futures::future::join_all(searches).await;

    for (query, results) in queries.iter().zip(answers) {
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| &r.title == query));
    }
}
