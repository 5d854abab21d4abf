use crate::signals::categories::{Category, CategoryStrength, MAX_CATEGORY_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category sub-scores. A category that was never set reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSet(BTreeMap<Category, u8>);

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sub-score, clamped to [`MAX_CATEGORY_SCORE`].
    pub fn set(&mut self, category: Category, score: u8) {
        self.0.insert(category, score.min(MAX_CATEGORY_SCORE));
    }

    pub fn with(mut self, category: Category, score: u8) -> Self {
        self.set(category, score);
        self
    }

    pub fn get(&self, category: Category) -> u8 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|&s| s as u32).sum()
    }

    pub fn strength(&self, category: Category) -> CategoryStrength {
        CategoryStrength::from_score(self.get(category))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u8)> + '_ {
        self.0.iter().map(|(&c, &s)| (c, s))
    }
}

impl FromIterator<(Category, u8)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (Category, u8)>>(iter: I) -> Self {
        let mut scores = ScoreSet::new();
        for (category, score) in iter {
            scores.set(category, score);
        }
        scores
    }
}

/// Overall reading of the composite percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLevel {
    Weak,
    Early,
    Moderate,
    Strong,
}

impl SignalLevel {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=24 => SignalLevel::Weak,
            25..=49 => SignalLevel::Early,
            50..=74 => SignalLevel::Moderate,
            _ => SignalLevel::Strong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalLevel::Weak => "Weak or No Bottom Signal",
            SignalLevel::Early => "Possible Early Bottom Signal",
            SignalLevel::Moderate => "Moderate Bottom Signal",
            SignalLevel::Strong => "Strong Bottom Signal",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            SignalLevel::Weak => {
                "Insufficient evidence of a market bottom at this time. Maintain defensive positioning and patience."
            }
            SignalLevel::Early => {
                "A few early indicators present, but caution is warranted. Continue monitoring for strengthening signals."
            }
            SignalLevel::Moderate => {
                "Some positive indicators are emerging, but confirmation is still needed. Consider preparing watchlists and potentially small initial positions."
            }
            SignalLevel::Strong => {
                "Multiple indicators suggest a potential market bottom forming. Consider gradually deploying capital while monitoring for confirmation."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    pub scores: ScoreSet,
    pub overall_percent: u8,
    pub level: SignalLevel,
}
