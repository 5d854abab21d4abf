//! Interval-driven refresh scheduler holding the latest snapshot.

use crate::config::RefreshInterval;
use crate::core::pipeline::SignalPipeline;
use crate::metrics::Metrics;
use crate::models::snapshot::MarketSnapshot;
use crate::models::universe::Universe;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tracing::{debug, info, warn};

const BUSY_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(Arc<MarketSnapshot>),
    /// Another cycle was already running; nothing was started.
    Skipped,
}

/// Clears the in-flight flag when the cycle ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the refresh timer and the single latest snapshot.
///
/// Cloning is cheap and every clone drives the same state.
#[derive(Clone)]
pub struct RefreshScheduler {
    pipeline: Arc<SignalPipeline>,
    universe: Arc<RwLock<Universe>>,
    latest: Arc<RwLock<Option<Arc<MarketSnapshot>>>>,
    in_flight: Arc<AtomicBool>,
    interval_ms: Arc<AtomicU64>,
    interval_changed: Arc<Notify>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
    metrics: Option<Arc<Metrics>>,
    rng_seed: Option<u64>,
    cycle: Arc<AtomicU64>,
}

impl RefreshScheduler {
    pub fn new(pipeline: SignalPipeline, universe: Universe, interval: RefreshInterval) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            universe: Arc::new(RwLock::new(universe)),
            latest: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(AtomicBool::new(false)),
            interval_ms: Arc::new(AtomicU64::new(interval.as_millis())),
            interval_changed: Arc::new(Notify::new()),
            handle: Arc::new(RwLock::new(None)),
            metrics: None,
            rng_seed: None,
            cycle: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Seed cycle `n` with `seed + n` so runs are reproducible.
    pub fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Run one cycle now unless one is already in flight.
    ///
    /// The previous snapshot stays readable until the new one is complete.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            if let Some(metrics) = &self.metrics {
                metrics.refresh_skipped_total.inc();
            }
            debug!("RefreshScheduler: cycle already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        let universe = self.universe.read().await.clone();
        let mut rng = self.next_rng();
        let snapshot = Arc::new(self.pipeline.run_cycle(&universe, &mut rng).await);

        *self.latest.write().await = Some(snapshot.clone());
        RefreshOutcome::Completed(snapshot)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn latest(&self) -> Option<Arc<MarketSnapshot>> {
        self.latest.read().await.clone()
    }

    /// Latest snapshot, running a first cycle if none exists yet.
    pub async fn latest_or_refresh(&self) -> Arc<MarketSnapshot> {
        loop {
            if let Some(snapshot) = self.latest().await {
                return snapshot;
            }
            match self.refresh_now().await {
                RefreshOutcome::Completed(snapshot) => return snapshot,
                RefreshOutcome::Skipped => tokio::time::sleep(BUSY_POLL).await,
            }
        }
    }

    /// Start the timer: one cycle immediately, then one per interval.
    pub async fn start(&self) {
        let mut handle = self.handle.write().await;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("RefreshScheduler: already running");
            return;
        }

        let scheduler = self.clone();
        *handle = Some(tokio::spawn(async move { scheduler.run_loop().await }));

        info!(
            interval_ms = self.interval().as_millis(),
            provider = self.pipeline.provider_name(),
            "RefreshScheduler: started"
        );
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("RefreshScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn interval(&self) -> RefreshInterval {
        RefreshInterval::from_millis(self.interval_ms.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Change the interval; a running timer restarts its wait with the new value.
    pub fn set_interval(&self, interval: RefreshInterval) {
        let previous = self.interval_ms.swap(interval.as_millis(), Ordering::AcqRel);
        if previous != interval.as_millis() {
            info!(
                previous_ms = previous,
                interval_ms = interval.as_millis(),
                "RefreshScheduler: interval changed"
            );
        }
        self.interval_changed.notify_one();
    }

    pub async fn universe(&self) -> Universe {
        self.universe.read().await.clone()
    }

    /// Track a ticker from the next cycle on. Returns `false` if it was
    /// blank or already tracked.
    pub async fn add_ticker(&self, ticker: &str) -> bool {
        let added = self.universe.write().await.add_ticker(ticker);
        if added {
            info!(ticker = %ticker.trim().to_uppercase(), "Watchlist ticker added");
        }
        added
    }

    pub async fn remove_ticker(&self, ticker: &str) -> bool {
        let removed = self.universe.write().await.remove_ticker(ticker);
        if removed {
            info!(ticker = %ticker.trim().to_uppercase(), "Watchlist ticker removed");
        }
        removed
    }

    async fn run_loop(&self) {
        loop {
            match self.refresh_now().await {
                RefreshOutcome::Completed(snapshot) => debug!(
                    overall_percent = snapshot.overall_percent,
                    "RefreshScheduler: scheduled cycle done"
                ),
                RefreshOutcome::Skipped => {
                    debug!("RefreshScheduler: scheduled cycle skipped, manual refresh running")
                }
            }

            loop {
                let wait = self.interval().as_duration();
                tokio::select! {
                    _ = tokio::time::sleep(wait) => break,
                    _ = self.interval_changed.notified() => {
                        debug!("RefreshScheduler: rescheduling with new interval");
                    }
                }
            }
        }
    }

    fn next_rng(&self) -> StdRng {
        let cycle = self.cycle.fetch_add(1, Ordering::Relaxed);
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(cycle)),
            None => StdRng::from_entropy(),
        }
    }
}
