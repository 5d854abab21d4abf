//! Fallback generator
//!
//! Produces a complete bundle from nothing but the RNG, for cycles where the
//! upstream source failed or returned something the estimator rejected.

use crate::indicators::estimator::{is_easing_spike, RSI_OVERSOLD};
use crate::indicators::sampling::draw;
use crate::models::indicators::{
    AaiiSurvey, BreadthIndicators, IndicatorBundle, SectorPerformance, SentimentIndicators,
    TechnicalIndicators, ValuationIndicators, VolatilityIndicators, WatchlistEntry,
};
use crate::models::universe::Universe;
use rand::Rng;
use std::ops::RangeInclusive;

/// Change ranges (percent) for one performance row.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRanges {
    pub daily: RangeInclusive<f64>,
    pub weekly: RangeInclusive<f64>,
    pub monthly: RangeInclusive<f64>,
    pub year_to_date: RangeInclusive<f64>,
}

/// Bounds for every randomized field. Defaults are realistic ranges for a
/// stressed but not crashing market.
#[derive(Debug, Clone, PartialEq)]
pub struct MockRanges {
    pub vix: RangeInclusive<f64>,
    /// Closes preceding the current one.
    pub vix_history: RangeInclusive<f64>,
    /// Relative move from yesterday's close to today's, as a fraction.
    pub vix_daily_move: RangeInclusive<f64>,

    pub put_call_ratio: RangeInclusive<f64>,
    pub bull_bear_spread: RangeInclusive<f64>,
    pub fear_greed_index: RangeInclusive<f64>,
    pub aaii_bullish: RangeInclusive<f64>,
    pub aaii_bearish: RangeInclusive<f64>,
    pub aaii_neutral: RangeInclusive<f64>,
    pub institutional_flows: RangeInclusive<f64>,

    pub spy_price: RangeInclusive<f64>,
    pub sma50: RangeInclusive<f64>,
    pub sma200: RangeInclusive<f64>,
    pub rsi: RangeInclusive<f64>,
    pub max_reversal_patterns: u32,

    pub average_pe: RangeInclusive<f64>,
    pub historical_pe: RangeInclusive<f64>,
    pub average_pb: RangeInclusive<f64>,
    pub historical_pb: RangeInclusive<f64>,
    pub earnings_yield: RangeInclusive<f64>,
    pub historical_earnings_yield: RangeInclusive<f64>,

    pub advance_decline_ratio: RangeInclusive<f64>,
    pub percent_above_50dma: RangeInclusive<f64>,
    pub percent_above_200dma: RangeInclusive<f64>,
    pub new_highs_vs_lows: RangeInclusive<f64>,
    pub mc_clellan_oscillator: RangeInclusive<f64>,

    pub sector_moves: PerformanceRanges,
    pub relative_strength: RangeInclusive<f64>,

    pub stock_moves: PerformanceRanges,
    pub stock_price: RangeInclusive<f64>,
    pub stock_pe: RangeInclusive<f64>,
    pub stock_historical_pe: RangeInclusive<f64>,
    pub stock_volume: RangeInclusive<f64>,
    pub stock_avg_volume: RangeInclusive<f64>,
}

impl Default for MockRanges {
    fn default() -> Self {
        Self {
            vix: 20.0..=35.0,
            vix_history: 15.0..=40.0,
            vix_daily_move: -0.1..=0.1,

            put_call_ratio: 0.8..=1.4,
            bull_bear_spread: -20.0..=20.0,
            fear_greed_index: 10.0..=70.0,
            aaii_bullish: 20.0..=50.0,
            aaii_bearish: 20.0..=50.0,
            aaii_neutral: 10.0..=30.0,
            institutional_flows: -10.0..=10.0,

            spy_price: 400.0..=500.0,
            sma50: 420.0..=480.0,
            sma200: 410.0..=470.0,
            rsi: 30.0..=70.0,
            max_reversal_patterns: 3,

            average_pe: 15.0..=25.0,
            historical_pe: 18.0..=22.0,
            average_pb: 2.0..=5.0,
            historical_pb: 3.0..=4.0,
            earnings_yield: 0.03..=0.06,
            historical_earnings_yield: 0.04..=0.05,

            advance_decline_ratio: 0.5..=1.5,
            percent_above_50dma: 0.3..=0.7,
            percent_above_200dma: 0.4..=0.6,
            new_highs_vs_lows: -50.0..=50.0,
            mc_clellan_oscillator: -100.0..=100.0,

            sector_moves: PerformanceRanges {
                daily: -3.0..=3.0,
                weekly: -8.0..=8.0,
                monthly: -15.0..=15.0,
                year_to_date: -20.0..=20.0,
            },
            relative_strength: 0.7..=1.3,

            stock_moves: PerformanceRanges {
                daily: -5.0..=5.0,
                weekly: -10.0..=10.0,
                monthly: -20.0..=20.0,
                year_to_date: -30.0..=30.0,
            },
            stock_price: 50.0..=500.0,
            stock_pe: 10.0..=30.0,
            stock_historical_pe: 15.0..=25.0,
            stock_volume: 1_000_000.0..=10_000_000.0,
            stock_avg_volume: 2_000_000.0..=8_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    ranges: MockRanges,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ranges(ranges: MockRanges) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &MockRanges {
        &self.ranges
    }

    /// Generate a fully populated bundle. Never fails.
    pub fn generate<R: Rng + ?Sized>(&self, universe: &Universe, rng: &mut R) -> IndicatorBundle {
        let volatility = self.mock_volatility(rng);
        let technical = self.mock_technical(&volatility, rng);
        let r = &self.ranges;

        let sentiment = SentimentIndicators {
            put_call_ratio: draw(rng, &r.put_call_ratio),
            bull_bear_spread: draw(rng, &r.bull_bear_spread),
            fear_greed_index: draw(rng, &r.fear_greed_index),
            aaii: AaiiSurvey {
                bullish: draw(rng, &r.aaii_bullish),
                bearish: draw(rng, &r.aaii_bearish),
                neutral: draw(rng, &r.aaii_neutral),
            },
            institutional_flows: draw(rng, &r.institutional_flows),
        };

        let valuation = ValuationIndicators {
            average_pe: draw(rng, &r.average_pe),
            historical_pe: draw(rng, &r.historical_pe),
            average_pb: draw(rng, &r.average_pb),
            historical_pb: draw(rng, &r.historical_pb),
            earnings_yield: draw(rng, &r.earnings_yield),
            historical_earnings_yield: draw(rng, &r.historical_earnings_yield),
        };

        let breadth = BreadthIndicators {
            advance_decline_ratio: draw(rng, &r.advance_decline_ratio),
            percent_above_50dma: draw(rng, &r.percent_above_50dma),
            percent_above_200dma: draw(rng, &r.percent_above_200dma),
            new_highs_vs_lows: draw(rng, &r.new_highs_vs_lows),
            mc_clellan_oscillator: draw(rng, &r.mc_clellan_oscillator),
        };

        let sectors = universe
            .sectors
            .iter()
            .map(|name| SectorPerformance {
                name: name.clone(),
                daily_change: draw(rng, &r.sector_moves.daily),
                weekly_change: draw(rng, &r.sector_moves.weekly),
                monthly_change: draw(rng, &r.sector_moves.monthly),
                year_to_date_change: draw(rng, &r.sector_moves.year_to_date),
                relative_strength: draw(rng, &r.relative_strength),
            })
            .collect();

        let watchlist = universe
            .watchlist
            .iter()
            .map(|ticker| WatchlistEntry {
                ticker: ticker.clone(),
                price: draw(rng, &r.stock_price),
                daily_change: draw(rng, &r.stock_moves.daily),
                weekly_change: draw(rng, &r.stock_moves.weekly),
                monthly_change: draw(rng, &r.stock_moves.monthly),
                year_to_date_change: draw(rng, &r.stock_moves.year_to_date),
                pe: draw(rng, &r.stock_pe),
                historical_avg_pe: draw(rng, &r.stock_historical_pe),
                volume: draw(rng, &r.stock_volume).floor(),
                avg_volume: draw(rng, &r.stock_avg_volume).floor(),
                rsi: draw(rng, &r.rsi),
            })
            .collect();

        IndicatorBundle {
            volatility,
            sentiment,
            technical,
            valuation,
            breadth,
            sectors,
            watchlist,
        }
    }

    /// A 90-close history whose first two entries are today and yesterday;
    /// the averages are computed from it so the section stays consistent.
    fn mock_volatility<R: Rng + ?Sized>(&self, rng: &mut R) -> VolatilityIndicators {
        let r = &self.ranges;
        let current = draw(rng, &r.vix);
        let yesterday = current * (1.0 + draw(rng, &r.vix_daily_move));

        let mut daily_series = Vec::with_capacity(90);
        daily_series.push(current);
        daily_series.push(yesterday);
        while daily_series.len() < 90 {
            daily_series.push(draw(rng, &r.vix_history));
        }

        let avg30 = daily_series[..30].iter().sum::<f64>() / 30.0;
        let avg90 = daily_series.iter().sum::<f64>() / daily_series.len() as f64;

        VolatilityIndicators {
            current,
            yesterday,
            avg30,
            avg90,
            daily_series,
        }
    }

    fn mock_technical<R: Rng + ?Sized>(
        &self,
        volatility: &VolatilityIndicators,
        rng: &mut R,
    ) -> TechnicalIndicators {
        let r = &self.ranges;
        let rsi = draw(rng, &r.rsi);
        let easing = is_easing_spike(volatility.current, volatility.yesterday);

        TechnicalIndicators {
            spy_price: draw(rng, &r.spy_price),
            sma50: draw(rng, &r.sma50),
            sma200: draw(rng, &r.sma200),
            rsi,
            macd_divergence: easing,
            rsi_oversold: rsi < RSI_OVERSOLD,
            bullish_reversal_count: rng.gen_range(0..=r.max_reversal_patterns),
        }
    }
}
