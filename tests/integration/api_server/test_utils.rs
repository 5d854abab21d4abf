//! Test utilities for API server integration tests

use axum_test::TestServer;
use market_bottom::config::RefreshInterval;
use market_bottom::core::http::{create_router, AppState};
use market_bottom::core::pipeline::SignalPipeline;
use market_bottom::core::scheduler::RefreshScheduler;
use market_bottom::error::DataError;
use market_bottom::metrics::Metrics;
use market_bottom::models::{RawObservation, Universe, VixClose};
use market_bottom::services::market_data::{MarketDataProvider, StaticMarketDataProvider};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub scheduler: RefreshScheduler,
}

impl TestApiServer {
    /// Server whose provider always returns a stressed-market observation.
    pub async fn new() -> Self {
        Self::with_provider(Arc::new(StaticMarketDataProvider::new(stressed_observation()))).await
    }

    #[allow(dead_code)]
    pub async fn failing(error: DataError) -> Self {
        Self::with_provider(Arc::new(StaticMarketDataProvider::failing(error))).await
    }

    pub async fn with_provider(provider: Arc<dyn MarketDataProvider + Send + Sync>) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let pipeline =
            SignalPipeline::new(provider, Duration::from_secs(2)).with_metrics(metrics.clone());
        let scheduler = RefreshScheduler::new(
            pipeline,
            Universe::new(
                vec!["AAPL".to_string(), "MSFT".to_string()],
                vec!["Technology".to_string(), "Energy".to_string()],
            ),
            RefreshInterval::default(),
        )
        .with_metrics(metrics.clone())
        .with_rng_seed(Some(1234));

        let state = AppState::new(scheduler.clone(), metrics.clone());
        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            scheduler,
        }
    }
}

pub fn stressed_observation() -> RawObservation {
    let latest = chrono::NaiveDate::from_ymd_opt(2024, 3, 28).expect("valid date");
    let closes = [34.0, 37.5, 33.0, 29.0, 26.0, 22.0, 20.0, 19.0];
    let series = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| VixClose::new(latest - chrono::Duration::days(i as i64), close))
        .collect();
    RawObservation::new(series, 418.25).with_rsi(27.5)
}

/// Provider that answers after a fixed delay.
pub struct DelayedProvider {
    delay: Duration,
}

impl DelayedProvider {
    #[allow(dead_code)]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl MarketDataProvider for DelayedProvider {
    fn name(&self) -> &str {
        "delayed"
    }

    async fn fetch_observation(&self) -> Result<RawObservation, DataError> {
        tokio::time::sleep(self.delay).await;
        Ok(stressed_observation())
    }
}
