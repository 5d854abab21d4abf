//! Thin HTTP client for the Alpha Vantage `/query` endpoint.

use super::parser::check_payload;
use crate::error::DataError;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct AlphaVantageClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
    max_retries: usize,
}

impl AlphaVantageClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("market-bottom/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(base_url, api_key, http)
    }

    pub fn with_client(base_url: impl Into<String>, api_key: Option<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http,
            max_retries: crate::config::DEFAULT_FETCH_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Run one query, retrying transport failures with exponential backoff.
    ///
    /// The returned body has already passed [`check_payload`].
    pub async fn query(&self, params: &[(&str, &str)]) -> Result<Value, DataError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DataError::InsufficientData("ALPHA_VANTAGE_API_KEY not configured".to_string())
        })?;

        let attempt = || async { self.query_once(api_key, params).await };

        attempt
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_times(self.max_retries),
            )
            .when(DataError::is_retryable)
            .notify(|err: &DataError, delay: Duration| {
                warn!(
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Alpha Vantage request failed, retrying"
                );
            })
            .await
    }

    async fn query_once(&self, api_key: &str, params: &[(&str, &str)]) -> Result<Value, DataError> {
        let function = params
            .iter()
            .find(|(k, _)| *k == "function")
            .map(|(_, v)| *v)
            .unwrap_or("unknown");
        debug!(function = function, "Alpha Vantage query");

        let response = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(params)
            .query(&[("apikey", api_key)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited(format!("HTTP 429 for {function}")));
        }
        if status.is_server_error() {
            return Err(DataError::Transport(format!("HTTP {status} for {function}")));
        }
        if !status.is_success() {
            return Err(DataError::MalformedResponse(format!(
                "HTTP {status} for {function}"
            )));
        }

        let body: Value = response.json().await?;
        check_payload(&body)?;
        Ok(body)
    }
}
