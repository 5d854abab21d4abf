//! Unit tests for the per-category scorers

use crate::common_fixtures::{calm_bundle, capitulation_bundle, volatility};
use market_bottom::signals::scoring::{
    score_breadth, score_sentiment, score_technical, score_valuation, score_volatility,
};

#[test]
fn calm_market_scores_zero_everywhere() {
    let bundle = calm_bundle();
    assert_eq!(score_technical(&bundle.technical), 0);
    assert_eq!(score_valuation(&bundle.valuation), 0);
    assert_eq!(score_breadth(&bundle.breadth), 0);
    assert_eq!(score_volatility(&bundle.volatility), 0);
    assert_eq!(score_sentiment(&bundle.sentiment), 0);
}

#[test]
fn capitulation_scores_three_everywhere() {
    let bundle = capitulation_bundle();
    assert_eq!(score_technical(&bundle.technical), 3);
    assert_eq!(score_valuation(&bundle.valuation), 3);
    assert_eq!(score_breadth(&bundle.breadth), 3);
    assert_eq!(score_volatility(&bundle.volatility), 3);
    assert_eq!(score_sentiment(&bundle.sentiment), 3);
}

#[test]
fn volatility_spike_that_is_easing_scores_three() {
    let v = volatility(35.0, 38.0, 30.0, 20.0);
    assert_eq!(score_volatility(&v), 3);
}

#[test]
fn vix_exactly_thirty_is_not_elevated() {
    // 30 > 30 is false; 30 > 20*1.5 is false; 30 < 31 && 30 > 25 holds.
    let v = volatility(30.0, 31.0, 25.0, 20.0);
    assert_eq!(score_volatility(&v), 1);

    let rising = volatility(30.0, 29.0, 25.0, 20.0);
    assert_eq!(score_volatility(&rising), 0);
}

#[test]
fn easing_condition_requires_vix_above_twenty_five() {
    let v = volatility(25.0, 28.0, 22.0, 20.0);
    assert_eq!(score_volatility(&v), 0);

    let v = volatility(25.5, 28.0, 22.0, 20.0);
    assert_eq!(score_volatility(&v), 1);
}

#[test]
fn technical_with_no_signals_scores_zero() {
    let mut technical = calm_bundle().technical;
    technical.rsi = 10.0;
    // Only the flags are scored, not the raw RSI.
    assert_eq!(score_technical(&technical), 0);

    technical.bullish_reversal_count = 1;
    assert_eq!(score_technical(&technical), 1);
}

#[test]
fn valuation_thresholds_are_strict() {
    let mut valuation = calm_bundle().valuation;
    valuation.historical_pe = 20.0;
    valuation.average_pe = 16.0;
    assert_eq!(score_valuation(&valuation), 0);

    valuation.average_pe = 15.99;
    assert_eq!(score_valuation(&valuation), 1);

    valuation.historical_earnings_yield = 0.05;
    valuation.earnings_yield = 0.0601;
    assert_eq!(score_valuation(&valuation), 2);
}

#[test]
fn breadth_counts_each_condition() {
    let mut breadth = calm_bundle().breadth;
    breadth.advance_decline_ratio = 1.0;
    assert_eq!(score_breadth(&breadth), 0);

    breadth.advance_decline_ratio = 1.01;
    assert_eq!(score_breadth(&breadth), 1);

    breadth.new_highs_vs_lows = 0.5;
    assert_eq!(score_breadth(&breadth), 2);
}

#[test]
fn sentiment_counts_contrarian_extremes() {
    let mut sentiment = calm_bundle().sentiment;
    sentiment.bull_bear_spread = -10.0;
    assert_eq!(score_sentiment(&sentiment), 0);

    sentiment.bull_bear_spread = -10.5;
    sentiment.fear_greed_index = 19.9;
    assert_eq!(score_sentiment(&sentiment), 2);
}

#[test]
fn scorers_are_idempotent() {
    let bundle = capitulation_bundle();
    for _ in 0..3 {
        assert_eq!(score_volatility(&bundle.volatility), 3);
        assert_eq!(score_sentiment(&bundle.sentiment), 3);
    }
    assert_eq!(
        score_breadth(&bundle.breadth),
        score_breadth(&bundle.breadth.clone())
    );
}
