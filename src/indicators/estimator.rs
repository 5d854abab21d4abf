//! Indicator estimator
//!
//! Expands the few values the upstream source actually provides (VIX closes,
//! SPY price, optionally RSI and the 50/200-day SMAs) into a full
//! [`IndicatorBundle`]. Volatility comes straight from the observed series.
//! Sentiment, valuation, breadth, sector and watchlist values cannot be
//! observed through the source, so they are modelled as functions of the VIX
//! level plus bounded jitter from the caller's RNG.

use crate::error::DataError;
use crate::indicators::profiles::{sector_profile, ticker_profile};
use crate::indicators::sampling::jitter;
use crate::models::indicators::{
    AaiiSurvey, BreadthIndicators, IndicatorBundle, SectorPerformance, SentimentIndicators,
    TechnicalIndicators, ValuationIndicators, VolatilityIndicators, WatchlistEntry,
};
use crate::models::observation::RawObservation;
use crate::models::universe::Universe;
use rand::Rng;

/// Long-run "calm market" VIX level. Stress is measured relative to it.
pub const VIX_BASELINE: f64 = 20.0;
/// VIX level above which a falling VIX counts as an easing spike.
pub const SPIKE_THRESHOLD: f64 = 25.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const SMA50_RATIO: f64 = 0.98;
pub const SMA200_RATIO: f64 = 0.95;
/// Maximum number of daily closes kept in the bundle.
pub const DAILY_SERIES_LEN: usize = 90;
const AVG30_WINDOW: usize = 30;
const AVG90_WINDOW: usize = 90;

/// Historical valuation anchors the estimated valuation is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalNorms {
    pub pe: f64,
    pub pb: f64,
    pub earnings_yield: f64,
}

impl Default for HistoricalNorms {
    fn default() -> Self {
        Self {
            pe: 20.0,
            pb: 3.5,
            earnings_yield: 0.045,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEstimator {
    norms: HistoricalNorms,
}

impl IndicatorEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_norms(norms: HistoricalNorms) -> Self {
        Self { norms }
    }

    /// Derive a complete bundle from a live observation.
    ///
    /// Fails with [`DataError::InsufficientData`] when the VIX series is
    /// missing or shorter than two closes, or the SPY price is unusable, and
    /// with [`DataError::MalformedResponse`] when observed numbers are not
    /// finite or the derived bundle would not be. Deterministic for a given RNG state.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        observation: &RawObservation,
        universe: &Universe,
        rng: &mut R,
    ) -> Result<IndicatorBundle, DataError> {
        let volatility = derive_volatility(observation)?;
        let technical = derive_technical(observation, &volatility)?;
        let vix = volatility.current;

        let sentiment = estimate_sentiment(vix, rng);
        let valuation = self.estimate_valuation(vix, rng);
        let breadth = estimate_breadth(&volatility, rng);
        let sectors = universe
            .sectors
            .iter()
            .map(|name| estimate_sector(name, &volatility, rng))
            .collect();
        let watchlist = universe
            .watchlist
            .iter()
            .map(|ticker| estimate_watchlist_entry(ticker, &volatility, technical.rsi, rng))
            .collect();

        let bundle = IndicatorBundle {
            volatility,
            sentiment,
            technical,
            valuation,
            breadth,
            sectors,
            watchlist,
        };

        // Extreme but finite closes can still overflow or divide out to inf.
        if !bundle.is_finite() {
            return Err(DataError::MalformedResponse(format!(
                "VIX closes produce non-finite indicators (current {}, yesterday {})",
                bundle.volatility.current, bundle.volatility.yesterday
            )));
        }

        Ok(bundle)
    }

    fn estimate_valuation<R: Rng + ?Sized>(&self, vix: f64, rng: &mut R) -> ValuationIndicators {
        // Multiples compress as volatility rises; yield is the P/E inverse.
        let average_pe = (24.0 - vix * 0.2 + jitter(rng, 0.5)).max(5.0);
        let average_pb = (4.2 - vix * 0.04 + jitter(rng, 0.1)).max(0.5);

        ValuationIndicators {
            average_pe,
            historical_pe: self.norms.pe,
            average_pb,
            historical_pb: self.norms.pb,
            earnings_yield: 1.0 / average_pe,
            historical_earnings_yield: self.norms.earnings_yield,
        }
    }
}

/// Volatility section from the observed VIX closes.
///
/// Closes are sorted newest first; averages use however many closes exist
/// inside each window.
pub fn derive_volatility(observation: &RawObservation) -> Result<VolatilityIndicators, DataError> {
    let series = observation.vix_series.as_ref().ok_or_else(|| {
        DataError::InsufficientData("VIX time series missing from payload".to_string())
    })?;

    if series.len() < 2 {
        return Err(DataError::InsufficientData(format!(
            "need at least 2 VIX closes, got {}",
            series.len()
        )));
    }

    if let Some(bad) = series.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
        return Err(DataError::MalformedResponse(format!(
            "invalid VIX close {} on {}",
            bad.close, bad.date
        )));
    }

    let mut sorted = series.clone();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let daily_series: Vec<f64> = sorted
        .iter()
        .take(DAILY_SERIES_LEN)
        .map(|p| p.close)
        .collect();

    Ok(VolatilityIndicators {
        current: daily_series[0],
        yesterday: daily_series[1],
        avg30: window_mean(&daily_series, AVG30_WINDOW),
        avg90: window_mean(&daily_series, AVG90_WINDOW),
        daily_series,
    })
}

/// Mean of the first `window` values, or of all of them when fewer exist.
fn window_mean(values: &[f64], window: usize) -> f64 {
    let n = values.len().min(window);
    if n == 0 {
        return 0.0;
    }
    values[..n].iter().sum::<f64>() / n as f64
}

/// RSI stand-in when the source has none: falls as VIX rises, floored at 30.
pub fn estimate_rsi(vix: f64) -> f64 {
    (60.0 - vix / 2.0).max(RSI_OVERSOLD)
}

/// VIX above the spike threshold and lower than the prior close.
pub fn is_easing_spike(current: f64, yesterday: f64) -> bool {
    current > SPIKE_THRESHOLD && yesterday > current
}

fn derive_technical(
    observation: &RawObservation,
    volatility: &VolatilityIndicators,
) -> Result<TechnicalIndicators, DataError> {
    let spy_price = observation.spy_price;
    if !spy_price.is_finite() || spy_price <= 0.0 {
        return Err(DataError::InsufficientData(format!(
            "SPY price unavailable ({spy_price})"
        )));
    }

    let rsi = observed_or("RSI", observation.spy_rsi, estimate_rsi(volatility.current))?;
    let sma50 = observed_or("SMA50", observation.spy_sma50, spy_price * SMA50_RATIO)?;
    let sma200 = observed_or("SMA200", observation.spy_sma200, spy_price * SMA200_RATIO)?;
    let easing = is_easing_spike(volatility.current, volatility.yesterday);

    Ok(TechnicalIndicators {
        spy_price,
        sma50,
        sma200,
        rsi,
        macd_divergence: easing,
        rsi_oversold: rsi < RSI_OVERSOLD,
        bullish_reversal_count: u32::from(easing),
    })
}

fn observed_or(name: &str, observed: Option<f64>, estimate: f64) -> Result<f64, DataError> {
    match observed {
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(DataError::MalformedResponse(format!(
            "{name} is not a finite number ({value})"
        ))),
        None => Ok(estimate),
    }
}

fn estimate_sentiment<R: Rng + ?Sized>(vix: f64, rng: &mut R) -> SentimentIndicators {
    // AAII readings are jittered independently and are not normalised to 100.
    let aaii = AaiiSurvey {
        bullish: (55.0 - vix * 0.8 + jitter(rng, 3.0)).clamp(0.0, 100.0),
        bearish: (20.0 + vix * 0.8 + jitter(rng, 3.0)).clamp(0.0, 100.0),
        neutral: (25.0 + jitter(rng, 5.0)).clamp(0.0, 100.0),
    };

    SentimentIndicators {
        put_call_ratio: (0.7 + vix * 0.02 + jitter(rng, 0.05)).max(0.3),
        bull_bear_spread: 20.0 - vix * 1.2 + jitter(rng, 3.0),
        fear_greed_index: (100.0 - vix * 2.5 + jitter(rng, 5.0)).clamp(0.0, 100.0),
        aaii,
        institutional_flows: 5.0 - vix * 0.3 + jitter(rng, 2.0),
    }
}

fn estimate_breadth<R: Rng + ?Sized>(
    volatility: &VolatilityIndicators,
    rng: &mut R,
) -> BreadthIndicators {
    let vix = volatility.current;
    // Positive when VIX fell since the prior close.
    let easing = (volatility.yesterday - vix).max(0.0);

    BreadthIndicators {
        advance_decline_ratio: (1.6 - vix * 0.025 + easing * 0.05 + jitter(rng, 0.1)).max(0.1),
        percent_above_50dma: (0.85 - vix * 0.015 + jitter(rng, 0.03)).clamp(0.0, 1.0),
        percent_above_200dma: (0.9 - vix * 0.012 + jitter(rng, 0.03)).clamp(0.0, 1.0),
        new_highs_vs_lows: 60.0 - vix * 2.5 + jitter(rng, 10.0),
        mc_clellan_oscillator: 50.0 - vix * 2.0 + easing * 3.0 + jitter(rng, 15.0),
    }
}

/// Percentage moves implied by VIX changes over each horizon.
struct ImpliedMoves {
    daily: f64,
    weekly: f64,
    monthly: f64,
    year_to_date: f64,
}

fn implied_moves<R: Rng + ?Sized>(
    beta: f64,
    volatility: &VolatilityIndicators,
    rng: &mut R,
) -> ImpliedMoves {
    let vix = volatility.current;
    let pct_change = |from: f64| (vix - from) / from * 100.0;

    ImpliedMoves {
        daily: -beta * pct_change(volatility.yesterday) * 0.1 + jitter(rng, 0.5),
        weekly: -beta * pct_change(volatility.avg30) * 0.15 + jitter(rng, 1.0),
        monthly: -beta * pct_change(volatility.avg90) * 0.25 + jitter(rng, 2.0),
        year_to_date: -beta * (vix - VIX_BASELINE) * 0.8 + jitter(rng, 3.0),
    }
}

fn estimate_sector<R: Rng + ?Sized>(
    name: &str,
    volatility: &VolatilityIndicators,
    rng: &mut R,
) -> SectorPerformance {
    let profile = sector_profile(name);
    let moves = implied_moves(profile.beta, volatility, rng);
    let stress = volatility.current - VIX_BASELINE;

    SectorPerformance {
        name: name.to_string(),
        daily_change: moves.daily,
        weekly_change: moves.weekly,
        monthly_change: moves.monthly,
        year_to_date_change: profile.ytd_base + moves.year_to_date,
        // Defensive sectors outperform when stress rises.
        relative_strength: (1.0 + (1.0 - profile.beta) * stress * 0.02 + jitter(rng, 0.05))
            .max(0.1),
    }
}

fn estimate_watchlist_entry<R: Rng + ?Sized>(
    ticker: &str,
    volatility: &VolatilityIndicators,
    market_rsi: f64,
    rng: &mut R,
) -> WatchlistEntry {
    let profile = ticker_profile(ticker);
    let moves = implied_moves(profile.beta, volatility, rng);
    let stress = volatility.current - VIX_BASELINE;

    let drawdown = (profile.beta * stress / 200.0).clamp(-0.5, 0.9);
    let price = (profile.base_price * (1.0 - drawdown) * (1.0 + jitter(rng, 0.01))).max(0.01);
    let volume = profile.avg_volume * (1.0 + stress.max(0.0) / 50.0) * (1.0 + jitter(rng, 0.1));
    let rsi = (market_rsi - (profile.beta - 1.0) * 10.0 + jitter(rng, 5.0)).clamp(0.0, 100.0);

    WatchlistEntry {
        ticker: ticker.to_string(),
        price,
        daily_change: moves.daily,
        weekly_change: moves.weekly,
        monthly_change: moves.monthly,
        year_to_date_change: moves.year_to_date,
        pe: profile.pe * price / profile.base_price,
        historical_avg_pe: profile.historical_avg_pe,
        volume: volume.max(0.0),
        avg_volume: profile.avg_volume,
        rsi,
    }
}
