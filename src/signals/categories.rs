//! Indicator categories and their sub-score scale

use serde::{Deserialize, Serialize};
use std::fmt;

/// Each category contributes at most this many points.
pub const MAX_CATEGORY_SCORE: u8 = 3;

/// Indicator category scored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Valuation,
    Breadth,
    Volatility,
    Sentiment,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technical,
        Category::Valuation,
        Category::Breadth,
        Category::Volatility,
        Category::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Valuation => "valuation",
            Category::Breadth => "breadth",
            Category::Volatility => "volatility",
            Category::Sentiment => "sentiment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Technical => "Technical Signals",
            Category::Valuation => "Valuation Metrics",
            Category::Breadth => "Market Breadth",
            Category::Volatility => "Volatility",
            Category::Sentiment => "Sentiment",
        }
    }

    /// Highest composite score reachable across all categories.
    pub fn max_total() -> u32 {
        Self::ALL.len() as u32 * MAX_CATEGORY_SCORE as u32
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a single category points at a bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStrength {
    None,
    Weak,
    Moderate,
    Strong,
}

impl CategoryStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => CategoryStrength::None,
            1 => CategoryStrength::Weak,
            2 => CategoryStrength::Moderate,
            _ => CategoryStrength::Strong,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CategoryStrength::None => "No bottom signal",
            CategoryStrength::Weak => "Weak bottom signal",
            CategoryStrength::Moderate => "Moderate bottom signal",
            CategoryStrength::Strong => "Strong bottom signal",
        }
    }
}
