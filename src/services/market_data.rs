//! Market data provider interface.

use crate::error::DataError;
use crate::models::observation::RawObservation;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch the raw observation set for one refresh cycle.
    async fn fetch_observation(&self) -> Result<RawObservation, DataError>;
}

/// Provider that replays a fixed result every cycle.
pub struct StaticMarketDataProvider {
    result: Result<RawObservation, DataError>,
}

impl StaticMarketDataProvider {
    pub fn new(observation: RawObservation) -> Self {
        Self {
            result: Ok(observation),
        }
    }

    pub fn failing(error: DataError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_observation(&self) -> Result<RawObservation, DataError> {
        self.result.clone()
    }
}
