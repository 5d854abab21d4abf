//! Per-category bottom scorers
//!
//! Every scorer counts how many fixed threshold conditions hold for its
//! category and caps the count at [`MAX_CATEGORY_SCORE`]. Comparisons run on
//! the raw values; nothing is rounded first.

use crate::models::indicators::{
    BreadthIndicators, SentimentIndicators, TechnicalIndicators, ValuationIndicators,
    VolatilityIndicators,
};
use crate::signals::categories::MAX_CATEGORY_SCORE;

fn count_conditions(conditions: &[bool]) -> u8 {
    let met = conditions.iter().filter(|&&c| c).count();
    (met.min(MAX_CATEGORY_SCORE as usize)) as u8
}

/// Divergence, oversold RSI and reversal patterns.
pub fn score_technical(technical: &TechnicalIndicators) -> u8 {
    count_conditions(&[
        technical.macd_divergence,
        technical.rsi_oversold,
        technical.bullish_reversal_count > 0,
    ])
}

/// Valuations at least 20% cheaper than their historical norms.
pub fn score_valuation(valuation: &ValuationIndicators) -> u8 {
    count_conditions(&[
        valuation.average_pe < valuation.historical_pe * 0.8,
        valuation.average_pb < valuation.historical_pb * 0.8,
        valuation.earnings_yield > valuation.historical_earnings_yield * 1.2,
    ])
}

/// Participation broadening out.
pub fn score_breadth(breadth: &BreadthIndicators) -> u8 {
    count_conditions(&[
        breadth.advance_decline_ratio > 1.0,
        breadth.percent_above_50dma > 0.4,
        breadth.new_highs_vs_lows > 0.0,
    ])
}

/// Elevated VIX, a spike versus the 90-day mean, and a spike that is easing.
pub fn score_volatility(volatility: &VolatilityIndicators) -> u8 {
    count_conditions(&[
        volatility.current > 30.0,
        volatility.current > volatility.avg90 * 1.5,
        volatility.current < volatility.yesterday && volatility.current > 25.0,
    ])
}

/// Extreme bearishness, read as a contrarian signal.
pub fn score_sentiment(sentiment: &SentimentIndicators) -> u8 {
    count_conditions(&[
        sentiment.put_call_ratio > 1.2,
        sentiment.bull_bear_spread < -10.0,
        sentiment.fear_greed_index < 20.0,
    ])
}
