//! One refresh cycle: fetch, derive (or fall back), score, snapshot.

use crate::error::DataError;
use crate::indicators::{IndicatorEstimator, MockGenerator};
use crate::metrics::Metrics;
use crate::models::indicators::IndicatorBundle;
use crate::models::observation::RawObservation;
use crate::models::snapshot::{MarketSnapshot, Provenance};
use crate::models::universe::Universe;
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::SignalEngine;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct SignalPipeline {
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    estimator: IndicatorEstimator,
    fallback: MockGenerator,
    fetch_timeout: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl SignalPipeline {
    pub fn new(
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            estimator: IndicatorEstimator::new(),
            fallback: MockGenerator::new(),
            fetch_timeout,
            metrics: None,
        }
    }

    pub fn with_estimator(mut self, estimator: IndicatorEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_fallback(mut self, fallback: MockGenerator) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run a full cycle. Upstream failures are absorbed into the fallback
    /// bundle, so this always yields a snapshot.
    pub async fn run_cycle<R: Rng + Send + ?Sized>(
        &self,
        universe: &Universe,
        rng: &mut R,
    ) -> MarketSnapshot {
        let fetch = self.provider.fetch_observation();
        let fetched = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(DataError::Timeout(self.fetch_timeout.as_millis() as u64)),
        };

        self.derive_snapshot(fetched, universe, rng)
    }

    /// Everything after the fetch. Synchronous and side-effect free apart
    /// from logging and metrics.
    pub fn derive_snapshot<R: Rng + ?Sized>(
        &self,
        fetched: Result<RawObservation, DataError>,
        universe: &Universe,
        rng: &mut R,
    ) -> MarketSnapshot {
        let derived = match fetched {
            Ok(observation) => self
                .estimator
                .estimate(&observation, universe, rng)
                .map(|bundle| (bundle, Provenance::live(observation.has_full_technicals()))),
            Err(err) => Err(err),
        };

        let (bundle, provenance) = match derived {
            Ok(derived) => derived,
            Err(err) => self.fall_back(err, universe, rng),
        };

        let signal = SignalEngine::evaluate(&bundle);
        let snapshot = MarketSnapshot::new(bundle, signal, provenance);
        self.record(&snapshot);

        info!(
            provider = self.provider.name(),
            source = snapshot.provenance.source.as_str(),
            overall_percent = snapshot.overall_percent,
            level = snapshot.level.label(),
            "Refresh cycle complete"
        );

        snapshot
    }

    fn fall_back<R: Rng + ?Sized>(
        &self,
        err: DataError,
        universe: &Universe,
        rng: &mut R,
    ) -> (IndicatorBundle, Provenance) {
        warn!(
            provider = self.provider.name(),
            kind = err.kind(),
            error = %err,
            "Market data unavailable, using fallback generator"
        );
        if let Some(metrics) = &self.metrics {
            metrics
                .upstream_failures_total
                .with_label_values(&[err.kind()])
                .inc();
        }

        (self.fallback.generate(universe, rng), Provenance::fallback(&err))
    }

    fn record(&self, snapshot: &MarketSnapshot) {
        let Some(metrics) = &self.metrics else {
            return;
        };

        metrics
            .refresh_cycles_total
            .with_label_values(&[snapshot.provenance.source.as_str()])
            .inc();
        metrics
            .bottom_signal_percent
            .set(i64::from(snapshot.overall_percent));
        for (category, score) in snapshot.scores.iter() {
            metrics
                .category_score
                .with_label_values(&[category.as_str()])
                .set(i64::from(score));
        }
    }
}
