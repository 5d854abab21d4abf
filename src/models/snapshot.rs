//! The object handed to the presentation layer after each refresh cycle.

use super::indicators::{
    BreadthIndicators, IndicatorBundle, SectorPerformance, SentimentIndicators,
    TechnicalIndicators, ValuationIndicators, VolatilityIndicators, WatchlistEntry,
};
use super::signal::{ScoreSet, SignalLevel, SignalResult};
use crate::error::DataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the bundle as a whole came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Fallback => "fallback",
        }
    }
}

/// Origin of the values in one bundle section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Observed,
    /// Some fields observed, the rest estimated.
    Partial,
    Estimated,
    Mocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOrigins {
    pub volatility: Origin,
    pub sentiment: Origin,
    pub technical: Origin,
    pub valuation: Origin,
    pub breadth: Origin,
    pub sectors: Origin,
    pub watchlist: Origin,
}

impl SectionOrigins {
    pub fn mocked() -> Self {
        Self {
            volatility: Origin::Mocked,
            sentiment: Origin::Mocked,
            technical: Origin::Mocked,
            valuation: Origin::Mocked,
            breadth: Origin::Mocked,
            sectors: Origin::Mocked,
            watchlist: Origin::Mocked,
        }
    }

    /// Origins for a bundle derived by the estimator from a live observation.
    pub fn estimated(full_technicals: bool) -> Self {
        Self {
            volatility: Origin::Observed,
            sentiment: Origin::Estimated,
            technical: if full_technicals {
                Origin::Observed
            } else {
                Origin::Partial
            },
            valuation: Origin::Estimated,
            breadth: Origin::Estimated,
            sectors: Origin::Estimated,
            watchlist: Origin::Estimated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackReason {
    pub kind: String,
    pub message: String,
}

impl From<&DataError> for FallbackReason {
    fn from(err: &DataError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Side-channel metadata telling observers how much of a snapshot is real.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    pub sections: SectionOrigins,
}

impl Provenance {
    pub fn live(full_technicals: bool) -> Self {
        Self {
            source: DataSource::Live,
            fallback_reason: None,
            sections: SectionOrigins::estimated(full_technicals),
        }
    }

    pub fn fallback(reason: &DataError) -> Self {
        Self {
            source: DataSource::Fallback,
            fallback_reason: Some(reason.into()),
            sections: SectionOrigins::mocked(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Bundle, scores and provenance for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub generated_at: DateTime<Utc>,
    pub volatility: VolatilityIndicators,
    pub sentiment: SentimentIndicators,
    pub technical: TechnicalIndicators,
    pub valuation: ValuationIndicators,
    pub breadth: BreadthIndicators,
    pub sectors: Vec<SectorPerformance>,
    pub watchlist: Vec<WatchlistEntry>,
    pub scores: ScoreSet,
    pub overall_percent: u8,
    pub level: SignalLevel,
    pub provenance: Provenance,
}

impl MarketSnapshot {
    pub fn new(bundle: IndicatorBundle, signal: SignalResult, provenance: Provenance) -> Self {
        Self {
            generated_at: Utc::now(),
            volatility: bundle.volatility,
            sentiment: bundle.sentiment,
            technical: bundle.technical,
            valuation: bundle.valuation,
            breadth: bundle.breadth,
            sectors: bundle.sectors,
            watchlist: bundle.watchlist,
            scores: signal.scores,
            overall_percent: signal.overall_percent,
            level: signal.level,
            provenance,
        }
    }
}
