//! Composite aggregation of category sub-scores

use crate::models::signal::{ScoreSet, SignalLevel};
use crate::signals::categories::Category;

/// Aggregate sub-scores into the overall bottom signal
pub struct Aggregator;

impl Aggregator {
    /// Normalize the summed sub-scores to a 0-100 percentage.
    ///
    /// The denominator is always the five-category maximum (15). A category
    /// missing from `scores` counts as zero rather than shrinking the
    /// denominator: absent data is absence of bottom evidence.
    pub fn overall_percent(scores: &ScoreSet) -> u8 {
        let total: u32 = Category::ALL.iter().map(|&c| scores.get(c) as u32).sum();
        let percent = (total as f64 / Category::max_total() as f64 * 100.0).round();
        percent.clamp(0.0, 100.0) as u8
    }

    pub fn level(scores: &ScoreSet) -> SignalLevel {
        SignalLevel::from_percent(Self::overall_percent(scores))
    }
}
