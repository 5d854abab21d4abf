use super::client::AlphaVantageClient;
use super::parser::{
    parse_daily_closes, parse_global_quote_price, parse_latest_indicator, RSI_SECTION_KEY,
    SMA_SECTION_KEY,
};
use crate::config::Config;
use crate::error::DataError;
use crate::models::observation::RawObservation;
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use tracing::{info, warn};

pub const DEFAULT_VIX_SYMBOL: &str = "^VIX";
pub const DEFAULT_SPY_SYMBOL: &str = "SPY";
pub const RSI_PERIOD: &str = "14";

/// Fetches the VIX series, the SPY quote and SPY's RSI/SMA readings.
///
/// VIX and the quote are required. Indicator endpoints are best effort:
/// a failure leaves the field unset, except a rate limit, which aborts the
/// whole fetch.
pub struct AlphaVantageProvider {
    client: AlphaVantageClient,
    vix_symbol: String,
    spy_symbol: String,
}

impl AlphaVantageProvider {
    pub fn new(client: AlphaVantageClient) -> Self {
        Self {
            client,
            vix_symbol: DEFAULT_VIX_SYMBOL.to_string(),
            spy_symbol: DEFAULT_SPY_SYMBOL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = AlphaVantageClient::new(
            config.alpha_vantage_base_url.clone(),
            config.alpha_vantage_api_key.clone(),
            config.fetch_timeout,
        )
        .with_max_retries(config.fetch_max_retries);
        Self::new(client)
    }

    pub fn with_symbols(mut self, vix: impl Into<String>, spy: impl Into<String>) -> Self {
        self.vix_symbol = vix.into();
        self.spy_symbol = spy.into();
        self
    }

    async fn fetch_indicator(
        &self,
        function: &str,
        time_period: &str,
        section: &str,
    ) -> Result<f64, DataError> {
        let body = self
            .client
            .query(&[
                ("function", function),
                ("symbol", self.spy_symbol.as_str()),
                ("interval", "daily"),
                ("time_period", time_period),
                ("series_type", "close"),
            ])
            .await?;
        parse_latest_indicator(&body, section, function)
    }

    async fn optional_indicator(
        &self,
        function: &str,
        time_period: &str,
        section: &str,
    ) -> Result<Option<f64>, DataError> {
        match self.fetch_indicator(function, time_period, section).await {
            Ok(value) => Ok(Some(value)),
            Err(err @ DataError::RateLimited(_)) => Err(err),
            Err(err) => {
                warn!(
                    function = function,
                    time_period = time_period,
                    error = %err,
                    kind = err.kind(),
                    "Indicator unavailable, continuing without it"
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alphavantage"
    }

    async fn fetch_observation(&self) -> Result<RawObservation, DataError> {
        let series_body = self
            .client
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", self.vix_symbol.as_str()),
                ("outputsize", "compact"),
            ])
            .await?;
        let vix_series = parse_daily_closes(&series_body)?.ok_or_else(|| {
            DataError::InsufficientData(format!(
                "time series missing for {}",
                self.vix_symbol
            ))
        })?;

        let quote_body = self
            .client
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", self.spy_symbol.as_str())])
            .await?;
        let spy_price = parse_global_quote_price(&quote_body)?;

        let spy_rsi = self
            .optional_indicator("RSI", RSI_PERIOD, RSI_SECTION_KEY)
            .await?;
        let spy_sma50 = self.optional_indicator("SMA", "50", SMA_SECTION_KEY).await?;
        let spy_sma200 = self.optional_indicator("SMA", "200", SMA_SECTION_KEY).await?;

        info!(
            vix_closes = vix_series.len(),
            spy_price = spy_price,
            has_rsi = spy_rsi.is_some(),
            has_smas = spy_sma50.is_some() && spy_sma200.is_some(),
            "Fetched Alpha Vantage observation"
        );

        Ok(RawObservation {
            vix_series: Some(vix_series),
            spy_price,
            spy_rsi,
            spy_sma50,
            spy_sma200,
        })
    }
}
