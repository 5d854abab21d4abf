//! Unit tests for the refresh pipeline

use crate::common_fixtures::observation;
use crate::common_providers::SlowProvider;
use market_bottom::core::pipeline::SignalPipeline;
use market_bottom::error::DataError;
use market_bottom::metrics::Metrics;
use market_bottom::models::{DataSource, Origin, RawObservation, Universe};
use market_bottom::services::market_data::StaticMarketDataProvider;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

fn universe() -> Universe {
    Universe::new(vec!["AAPL".to_string()], vec!["Energy".to_string()])
}

fn pipeline_with(provider: StaticMarketDataProvider, metrics: Arc<Metrics>) -> SignalPipeline {
    SignalPipeline::new(Arc::new(provider), Duration::from_secs(1)).with_metrics(metrics)
}

#[tokio::test]
async fn live_observation_produces_live_snapshot() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let obs = observation(&[35.0, 38.0, 30.0, 22.0], 420.0).with_rsi(28.0);
    let pipeline = pipeline_with(StaticMarketDataProvider::new(obs), metrics.clone());

    let snapshot = pipeline
        .run_cycle(&universe(), &mut StdRng::seed_from_u64(1))
        .await;

    assert_eq!(snapshot.provenance.source, DataSource::Live);
    assert!(snapshot.provenance.fallback_reason.is_none());
    assert_eq!(snapshot.provenance.sections.volatility, Origin::Observed);
    assert_eq!(snapshot.provenance.sections.technical, Origin::Partial);
    assert_eq!(snapshot.volatility.current, 35.0);
    assert_eq!(snapshot.technical.rsi, 28.0);
    assert_eq!(snapshot.watchlist.len(), 1);

    assert_eq!(
        metrics.refresh_cycles_total.with_label_values(&["live"]).get(),
        1
    );
    assert_eq!(
        metrics.bottom_signal_percent.get(),
        i64::from(snapshot.overall_percent)
    );
}

#[tokio::test]
async fn full_technicals_are_reported_observed() {
    let obs = observation(&[20.0, 21.0], 500.0)
        .with_rsi(45.0)
        .with_smas(490.0, 470.0);
    let pipeline = SignalPipeline::new(
        Arc::new(StaticMarketDataProvider::new(obs)),
        Duration::from_secs(1),
    );

    let snapshot = pipeline
        .run_cycle(&universe(), &mut StdRng::seed_from_u64(1))
        .await;
    assert_eq!(snapshot.provenance.sections.technical, Origin::Observed);
}

#[tokio::test]
async fn provider_failure_falls_back_to_mock_bundle() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let provider = StaticMarketDataProvider::failing(DataError::RateLimited("slow down".into()));
    let pipeline = pipeline_with(provider, metrics.clone());

    let snapshot = pipeline
        .run_cycle(&universe(), &mut StdRng::seed_from_u64(2))
        .await;

    assert_eq!(snapshot.provenance.source, DataSource::Fallback);
    assert_eq!(snapshot.provenance.sections.breadth, Origin::Mocked);
    let reason = snapshot.provenance.fallback_reason.as_ref().expect("reason");
    assert_eq!(reason.kind, "rate_limited");
    assert!(snapshot.overall_percent <= 100);
    assert_eq!(snapshot.volatility.daily_series.len(), 90);

    assert_eq!(
        metrics
            .upstream_failures_total
            .with_label_values(&["rate_limited"])
            .get(),
        1
    );
    assert_eq!(
        metrics.refresh_cycles_total.with_label_values(&["fallback"]).get(),
        1
    );
}

#[tokio::test]
async fn missing_time_series_falls_back_with_insufficient_data() {
    let mut obs = observation(&[20.0, 21.0], 450.0);
    obs.vix_series = None;
    let pipeline = SignalPipeline::new(
        Arc::new(StaticMarketDataProvider::new(obs)),
        Duration::from_secs(1),
    );

    let snapshot = pipeline
        .run_cycle(&universe(), &mut StdRng::seed_from_u64(3))
        .await;

    assert!(snapshot.provenance.is_fallback());
    assert_eq!(
        snapshot.provenance.fallback_reason.as_ref().map(|r| r.kind.as_str()),
        Some("insufficient_data")
    );
}

#[tokio::test]
async fn non_finite_estimate_falls_back_with_malformed_response() {
    let pipeline = SignalPipeline::new(
        Arc::new(StaticMarketDataProvider::new(observation(&[30.0, 1e-310], 450.0))),
        Duration::from_secs(1),
    );

    let snapshot = pipeline
        .run_cycle(&universe(), &mut StdRng::seed_from_u64(3))
        .await;

    assert!(snapshot.provenance.is_fallback());
    assert_eq!(
        snapshot.provenance.fallback_reason.as_ref().map(|r| r.kind.as_str()),
        Some("malformed_response")
    );
    let json = serde_json::to_string(&snapshot).expect("serialize");
    assert!(!json.contains("null"), "non-finite value leaked: {json}");
}

#[tokio::test]
async fn slow_provider_times_out_into_fallback() {
    let provider = SlowProvider::new(Duration::from_millis(500), observation(&[20.0, 21.0], 450.0));
    let pipeline = SignalPipeline::new(Arc::new(provider), Duration::from_millis(20));

    let snapshot = pipeline
        .run_cycle(&universe(), &mut StdRng::seed_from_u64(4))
        .await;

    let reason = snapshot.provenance.fallback_reason.as_ref().expect("reason");
    assert_eq!(reason.kind, "timeout");
}

#[test]
fn same_seed_gives_same_snapshot_contents() {
    let pipeline = SignalPipeline::new(
        Arc::new(StaticMarketDataProvider::failing(DataError::Transport("down".into()))),
        Duration::from_secs(1),
    );
    let fetched =
        || -> Result<RawObservation, DataError> { Err(DataError::Transport("down".into())) };

    let a = pipeline.derive_snapshot(fetched(), &universe(), &mut StdRng::seed_from_u64(8));
    let b = pipeline.derive_snapshot(fetched(), &universe(), &mut StdRng::seed_from_u64(8));

    assert_eq!(a.volatility, b.volatility);
    assert_eq!(a.sentiment, b.sentiment);
    assert_eq!(a.watchlist, b.watchlist);
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.overall_percent, b.overall_percent);
}
