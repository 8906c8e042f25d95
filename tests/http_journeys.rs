//! HTTP user journeys against the dashboard router
//!
//! Requests go through the full axum stack with the offline provider, the
//! same way a browser or a script would talk to `tickdash`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tickdash_core::{CacheConfig, DataAccess, FixtureProvider, Operation};
use tickdash_web::{create_app, AppState};
use tower::ServiceExt;

fn app_with(provider: &Arc<FixtureProvider>) -> Router {
    let data = DataAccess::new(provider.clone(), CacheConfig::default());
    create_app(AppState::new(data, "AAPL"))
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

// =============================================================================
// Page
// =============================================================================

#[tokio::test]
async fn when_a_browser_opens_the_root_the_system_serves_the_default_dashboard() {
    // Given: A running dashboard
    let provider = Arc::new(FixtureProvider::new());
    let app = app_with(&provider);

    // When: The root page is requested without a query
    let (status, body) = send(&app, Method::GET, "/").await;

    // Then: The page shows AAPL with both charts wired up
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Stock Dashboard</title>"));
    assert!(body.contains("Enter a stock symbol"));
    assert!(body.contains(r#"value="AAPL""#));
    assert!(body.contains("Name: Apple Inc."));
    assert!(body.contains("Market Cap: $3,000,000,000,000"));
    assert!(body.contains("Plotly.newPlot"));
    assert!(body.contains(r##"vegaEmbed("#revenue""##));
    assert!(body.contains(r#"value="Quarterly" checked"#));
}

#[tokio::test]
async fn when_the_period_is_unknown_the_system_rejects_the_request() {
    // Given: A running dashboard
    let provider = Arc::new(FixtureProvider::new());
    let app = app_with(&provider);

    // When: An unsupported period is requested
    let (status, body) = send(&app, Method::GET, "/?symbol=AAPL&period=monthly").await;

    // Then: 400 with a JSON error and no upstream traffic
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json(&body);
    assert_eq!(error["status"], 400);
    assert_eq!(
        error["error"],
        "invalid period selection 'monthly', expected Quarterly or Annual"
    );
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn when_symbol_text_contains_markup_the_system_escapes_it() {
    // Given: A running dashboard
    let provider = Arc::new(FixtureProvider::new());
    let app = app_with(&provider);

    // When: The symbol carries HTML
    let (status, body) = send(&app, Method::GET, "/?symbol=%3Cb%3EX").await;

    // Then: The input and company name show the text instead of a tag
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="&lt;b&gt;X""#));
    assert!(body.contains("<h3>Name: &lt;b&gt;X Holdings Inc.</h3>"));
    assert!(!body.contains("<h3>Name: <b>"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn when_a_script_requests_annual_data_the_system_returns_the_page_model() {
    // Given: A running dashboard
    let provider = Arc::new(FixtureProvider::new());
    let app = app_with(&provider);

    // When: The JSON twin of the page is requested for the annual view
    let (status, body) = send(&app, Method::GET, "/api/dashboard?symbol=AAPL&period=annual").await;

    // Then: Sections are tagged and the bars are labelled by year
    assert_eq!(status, StatusCode::OK);
    let page = json(&body);
    assert_eq!(page["title"], "Stock Dashboard");
    assert_eq!(page["company"]["status"], "ready");
    assert_eq!(page["company"]["content"]["lines"][2], "Sector: Technology");
    assert_eq!(page["financials"]["toggle"]["selected"], "Annual");
    let revenue = &page["financials"]["charts"]["content"]["revenue"];
    assert_eq!(revenue["encoding"]["x"]["field"], "Year");
    assert_eq!(revenue["data"]["values"][0]["Year"], "2023");
    assert_eq!(
        page["chart"]["content"]["candlestick"]["data"][0]["type"],
        "candlestick"
    );
}

#[tokio::test]
async fn when_the_cache_is_cleared_the_system_reports_and_drops_entries() {
    // Given: A dashboard that has rendered one symbol
    let provider = Arc::new(FixtureProvider::new());
    let app = app_with(&provider);
    send(&app, Method::GET, "/?symbol=MSFT").await;

    // When: The cache is inspected, cleared and inspected again
    let (_, before) = send(&app, Method::GET, "/api/cache").await;
    let (status, cleared) = send(&app, Method::DELETE, "/api/cache").await;
    let (_, after) = send(&app, Method::GET, "/api/cache").await;

    // Then: One entry per operation existed and none remain
    assert_eq!(status, StatusCode::OK);
    let before = json(&before);
    assert_eq!(before["provider"], "fixture");
    for operation in Operation::ALL {
        assert_eq!(before["entries"][operation.as_str()], 1, "{operation}");
    }
    assert_eq!(json(&cleared)["entries"], before["entries"]);
    for operation in Operation::ALL {
        assert_eq!(json(&after)["entries"][operation.as_str()], 0, "{operation}");
    }

    // And: The next page view goes upstream again
    send(&app, Method::GET, "/?symbol=MSFT").await;
    assert_eq!(provider.calls(Operation::CompanyInfo), 2);
}

#[tokio::test]
async fn when_a_probe_checks_health_the_system_reports_healthy() {
    // Given: A running dashboard
    let provider = Arc::new(FixtureProvider::new());
    let app = app_with(&provider);

    // When: The health endpoint is polled
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router responds");

    // Then: It answers with JSON
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let health: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["provider"], "fixture");
}
