pub mod alphavantage;
pub mod market_data;

pub use alphavantage::{AlphaVantageClient, AlphaVantageProvider};
pub use market_data::{MarketDataProvider, StaticMarketDataProvider};
