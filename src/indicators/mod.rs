pub mod estimator;
pub mod fallback;
pub mod profiles;
pub mod sampling;

pub use estimator::{HistoricalNorms, IndicatorEstimator};
pub use fallback::{MockGenerator, MockRanges, PerformanceRanges};
