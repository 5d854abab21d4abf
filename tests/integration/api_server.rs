//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the signal/settings API.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use market_bottom::error::DataError;
use market_bottom::models::MarketSnapshot;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use test_utils::{DelayedProvider, TestApiServer};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "market-bottom-signal-engine");
}

#[tokio::test]
async fn health_endpoint_reports_degraded_after_fallback_cycle() {
    let app = TestApiServer::failing(DataError::RateLimited("quota".to_string())).await;

    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");

    let response = app.server.post("/api/refresh").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn health_endpoint_stays_healthy_after_live_cycle() {
    let app = TestApiServer::new().await;
    let _ = app.server.post("/api/refresh").await;

    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.post("/api/refresh").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for metric in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "refresh_cycles_total",
        "bottom_signal_percent",
        "category_score",
    ] {
        assert!(body.contains(metric), "Expected {metric} metric");
    }
}

#[tokio::test]
async fn signal_endpoint_runs_first_cycle_on_demand() {
    let app = TestApiServer::new().await;
    assert!(app.scheduler.latest().await.is_none());

    let response = app.server.get("/api/signal").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!(body["overallPercent"].as_u64().unwrap() <= 100);
    assert_eq!(body["provenance"]["source"], "live");
    assert_eq!(body["volatility"]["current"], 34.0);
    assert_eq!(body["technical"]["rsiOversold"], true);
    assert_eq!(body["watchlist"].as_array().unwrap().len(), 2);
    for category in ["technical", "valuation", "breadth", "volatility", "sentiment"] {
        assert!(body["scores"][category].as_u64().unwrap() <= 3);
    }

    assert!(app.scheduler.latest().await.is_some());
}

#[tokio::test]
async fn signal_endpoint_returns_cached_snapshot() {
    let app = TestApiServer::new().await;
    let first: MarketSnapshot = app.server.get("/api/signal").await.json();
    let second: MarketSnapshot = app.server.get("/api/signal").await.json();
    assert_eq!(first.generated_at, second.generated_at);
}

#[tokio::test]
async fn refresh_endpoint_produces_new_snapshot() {
    let app = TestApiServer::new().await;
    let first: MarketSnapshot = app.server.post("/api/refresh").await.json();

    let response = app.server.post("/api/refresh").await;
    assert_eq!(response.status_code(), 200);
    let second: MarketSnapshot = response.json();
    assert!(second.generated_at >= first.generated_at);
}

#[tokio::test]
async fn refresh_endpoint_conflicts_while_cycle_in_flight() {
    let provider = Arc::new(DelayedProvider::new(Duration::from_millis(200)));
    let app = TestApiServer::with_provider(provider).await;

    let background = app.scheduler.clone();
    let running = tokio::spawn(async move { background.refresh_now().await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    let response = app.server.post("/api/refresh").await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("already in progress"));

    running.await.unwrap();
    assert_eq!(app.metrics.refresh_skipped_total.get(), 1);
}

#[tokio::test]
async fn upstream_failure_is_visible_in_provenance() {
    let app = TestApiServer::failing(DataError::RateLimited("25 requests per day".into())).await;

    let body: Value = app.server.get("/api/signal").await.json();
    assert_eq!(body["provenance"]["source"], "fallback");
    assert_eq!(body["provenance"]["fallbackReason"]["kind"], "rate_limited");
    assert_eq!(body["provenance"]["sections"]["volatility"], "mocked");
    assert_eq!(body["volatility"]["dailySeries"].as_array().unwrap().len(), 90);
}

#[tokio::test]
async fn settings_endpoint_lists_interval_and_universe() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/settings").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["refreshIntervalMs"], 300_000);
    assert_eq!(body["presets"], json!([60_000, 300_000, 900_000]));
    assert_eq!(body["watchlist"], json!(["AAPL", "MSFT"]));
    assert_eq!(body["sectors"], json!(["Technology", "Energy"]));
}

#[tokio::test]
async fn refresh_interval_can_be_updated() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .put("/api/settings/refresh-interval")
        .json(&json!({ "intervalMs": 60_000 }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["refreshIntervalMs"], 60_000);
    assert_eq!(app.scheduler.interval().as_millis(), 60_000);
}

#[tokio::test]
async fn zero_refresh_interval_is_rejected() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .put("/api/settings/refresh-interval")
        .json(&json!({ "intervalMs": 0 }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(app.scheduler.interval().as_millis(), 300_000);
}

#[tokio::test]
async fn watchlist_add_normalises_and_deduplicates() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .post("/api/watchlist")
        .json(&json!({ "ticker": " nvda " }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["watchlist"], json!(["AAPL", "MSFT", "NVDA"]));

    let body: Value = app
        .server
        .post("/api/watchlist")
        .json(&json!({ "ticker": "NVDA" }))
        .await
        .json();
    assert_eq!(body["watchlist"], json!(["AAPL", "MSFT", "NVDA"]));

    let response = app
        .server
        .post("/api/watchlist")
        .json(&json!({ "ticker": "  " }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn watchlist_remove_and_missing_ticker() {
    let app = TestApiServer::new().await;

    let response = app.server.delete("/api/watchlist/msft").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["watchlist"], json!(["AAPL"]));

    let response = app.server.delete("/api/watchlist/MSFT").await;
    assert_eq!(response.status_code(), 404);

    let snapshot: Value = app.server.post("/api/refresh").await.json();
    assert_eq!(snapshot["watchlist"][0]["ticker"], "AAPL");
    assert_eq!(snapshot["watchlist"].as_array().unwrap().len(), 1);
}
