//! Prometheus metrics for the HTTP surface and the refresh pipeline.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    /// Completed refresh cycles, labelled by `source` (`live` / `fallback`).
    pub refresh_cycles_total: IntCounterVec,
    /// Refresh attempts dropped because another cycle was running.
    pub refresh_skipped_total: IntCounter,
    /// Upstream failures that triggered the fallback, labelled by error `kind`.
    pub upstream_failures_total: IntCounterVec,
    pub bottom_signal_percent: IntGauge,
    pub category_score: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total number of HTTP requests served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let refresh_cycles_total = IntCounterVec::new(
            Opts::new("refresh_cycles_total", "Completed refresh cycles by data source"),
            &["source"],
        )?;
        let refresh_skipped_total = IntCounter::with_opts(Opts::new(
            "refresh_skipped_total",
            "Refresh requests skipped because a cycle was already in flight",
        ))?;
        let upstream_failures_total = IntCounterVec::new(
            Opts::new(
                "upstream_failures_total",
                "Upstream failures that forced the fallback generator, by error kind",
            ),
            &["kind"],
        )?;
        let bottom_signal_percent = IntGauge::with_opts(Opts::new(
            "bottom_signal_percent",
            "Latest overall bottom signal strength (0-100)",
        ))?;
        let category_score = IntGaugeVec::new(
            Opts::new("category_score", "Latest sub-score (0-3) per indicator category"),
            &["category"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(refresh_cycles_total.clone()))?;
        registry.register(Box::new(refresh_skipped_total.clone()))?;
        registry.register(Box::new(upstream_failures_total.clone()))?;
        registry.register(Box::new(bottom_signal_percent.clone()))?;
        registry.register(Box::new(category_score.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            refresh_cycles_total,
            refresh_skipped_total,
            upstream_failures_total,
            bottom_signal_percent,
            category_score,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
