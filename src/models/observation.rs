use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily VIX close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VixClose {
    pub date: NaiveDate,
    pub close: f64,
}

impl VixClose {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// The directly observed market values for one refresh cycle.
///
/// `vix_series` is `None` when the upstream payload did not contain a time
/// series at all, which is distinct from an empty or one-point series.
/// Order of the series is not guaranteed; the estimator sorts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub vix_series: Option<Vec<VixClose>>,
    pub spy_price: f64,
    pub spy_rsi: Option<f64>,
    pub spy_sma50: Option<f64>,
    pub spy_sma200: Option<f64>,
}

impl RawObservation {
    pub fn new(vix_series: Vec<VixClose>, spy_price: f64) -> Self {
        Self {
            vix_series: Some(vix_series),
            spy_price,
            spy_rsi: None,
            spy_sma50: None,
            spy_sma200: None,
        }
    }

    pub fn with_rsi(mut self, rsi: f64) -> Self {
        self.spy_rsi = Some(rsi);
        self
    }

    pub fn with_smas(mut self, sma50: f64, sma200: f64) -> Self {
        self.spy_sma50 = Some(sma50);
        self.spy_sma200 = Some(sma200);
        self
    }

    /// True when RSI and both moving averages came from the source.
    pub fn has_full_technicals(&self) -> bool {
        self.spy_rsi.is_some() && self.spy_sma50.is_some() && self.spy_sma200.is_some()
    }
}
