//! Scores a full indicator bundle.

use crate::models::indicators::IndicatorBundle;
use crate::models::signal::{ScoreSet, SignalLevel, SignalResult};
use crate::signals::aggregation::Aggregator;
use crate::signals::categories::Category;
use crate::signals::scoring::{
    score_breadth, score_sentiment, score_technical, score_valuation, score_volatility,
};

pub struct SignalEngine;

impl SignalEngine {
    /// Run all five category scorers.
    pub fn score(bundle: &IndicatorBundle) -> ScoreSet {
        ScoreSet::new()
            .with(Category::Technical, score_technical(&bundle.technical))
            .with(Category::Valuation, score_valuation(&bundle.valuation))
            .with(Category::Breadth, score_breadth(&bundle.breadth))
            .with(Category::Volatility, score_volatility(&bundle.volatility))
            .with(Category::Sentiment, score_sentiment(&bundle.sentiment))
    }

    pub fn evaluate(bundle: &IndicatorBundle) -> SignalResult {
        let scores = Self::score(bundle);
        let overall_percent = Aggregator::overall_percent(&scores);
        SignalResult {
            level: SignalLevel::from_percent(overall_percent),
            scores,
            overall_percent,
        }
    }
}
