//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod observation;
pub mod signal;
pub mod snapshot;
pub mod universe;

pub use indicators::{
    AaiiSurvey, BreadthIndicators, IndicatorBundle, SectorPerformance, SentimentIndicators,
    TechnicalIndicators, ValuationIndicators, VolatilityIndicators, WatchlistEntry,
};
pub use observation::{RawObservation, VixClose};
pub use signal::{ScoreSet, SignalLevel, SignalResult};
pub use snapshot::{DataSource, FallbackReason, MarketSnapshot, Origin, Provenance, SectionOrigins};
pub use universe::Universe;
