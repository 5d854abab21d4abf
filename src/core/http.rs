//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::RefreshInterval;
use crate::core::scheduler::{RefreshOutcome, RefreshScheduler};
use crate::metrics::Metrics;
use crate::models::snapshot::MarketSnapshot;

pub const SERVICE_NAME: &str = "market-bottom-signal-engine";

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub scheduler: RefreshScheduler,
}

impl AppState {
    pub fn new(scheduler: RefreshScheduler, metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            scheduler,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// The latest snapshot was served from the fallback generator.
    Degraded,
}

impl HealthStatus {
    pub fn from_snapshot(snapshot: Option<&MarketSnapshot>) -> Self {
        match snapshot {
            Some(s) if s.provenance.is_fallback() => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let latest = state.scheduler.latest().await;
    let health = HealthStatus::from_snapshot(latest.as_deref());
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.as_str(),
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub refresh_interval_ms: u64,
    pub presets: Vec<u64>,
    pub watchlist: Vec<String>,
    pub sectors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshIntervalRequest {
    pub interval_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddTickerRequest {
    pub ticker: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn settings_response(state: &AppState) -> SettingsResponse {
    let universe = state.scheduler.universe().await;
    SettingsResponse {
        refresh_interval_ms: state.scheduler.interval().as_millis(),
        presets: RefreshInterval::PRESETS.to_vec(),
        watchlist: universe.watchlist,
        sectors: universe.sectors,
    }
}

/// Latest snapshot; the first request runs a cycle if none has completed yet.
async fn get_signal(State(state): State<AppState>) -> Json<MarketSnapshot> {
    let snapshot = state.scheduler.latest_or_refresh().await;
    Json(snapshot.as_ref().clone())
}

/// Run a cycle now; 409 when one is already in flight.
async fn refresh_signal(State(state): State<AppState>) -> Response {
    match state.scheduler.refresh_now().await {
        RefreshOutcome::Completed(snapshot) => Json(snapshot.as_ref().clone()).into_response(),
        RefreshOutcome::Skipped => {
            error_response(StatusCode::CONFLICT, "a refresh is already in progress")
        }
    }
}

async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(settings_response(&state).await)
}

async fn update_refresh_interval(
    State(state): State<AppState>,
    Json(request): Json<RefreshIntervalRequest>,
) -> Response {
    match RefreshInterval::from_millis(request.interval_ms) {
        Ok(interval) => {
            state.scheduler.set_interval(interval);
            Json(settings_response(&state).await).into_response()
        }
        Err(e) => {
            warn!(interval_ms = request.interval_ms, error = %e, "Rejected refresh interval");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

async fn add_ticker(
    State(state): State<AppState>,
    Json(request): Json<AddTickerRequest>,
) -> Response {
    if request.ticker.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "ticker must not be empty");
    }

    // Adding a ticker that is already tracked is a no-op, not an error.
    state.scheduler.add_ticker(&request.ticker).await;
    Json(settings_response(&state).await).into_response()
}

async fn remove_ticker(State(state): State<AppState>, Path(ticker): Path<String>) -> Response {
    if state.scheduler.remove_ticker(&ticker).await {
        Json(settings_response(&state).await).into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            format!("ticker '{}' is not on the watchlist", ticker.to_uppercase()),
        )
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signal", get(get_signal))
        .route("/api/refresh", post(refresh_signal))
        .route("/api/settings", get(get_settings))
        .route("/api/settings/refresh-interval", put(update_refresh_interval))
        .route("/api/watchlist", post(add_ticker))
        .route("/api/watchlist/{ticker}", delete(remove_ticker))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
