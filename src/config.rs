//! Environment-driven configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::num::NonZeroU64;
use std::time::Duration;

pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FETCH_MAX_RETRIES: usize = 2;

pub const DEFAULT_WATCHLIST: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "META"];
pub const DEFAULT_SECTORS: [&str; 5] = [
    "Technology",
    "Healthcare",
    "Consumer Cyclical",
    "Energy",
    "Financials",
];

/// Current deployment environment (`APP_ENV`, falling back to `ENVIRONMENT`).
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

/// How often the dashboard refreshes, in milliseconds.
///
/// Any positive value is accepted; [`RefreshInterval::PRESETS`] are the values
/// offered by the UI selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RefreshInterval(NonZeroU64);

impl RefreshInterval {
    pub const ONE_MINUTE_MS: u64 = 60_000;
    pub const FIVE_MINUTES_MS: u64 = 300_000;
    pub const FIFTEEN_MINUTES_MS: u64 = 900_000;
    pub const PRESETS: [u64; 3] = [
        Self::ONE_MINUTE_MS,
        Self::FIVE_MINUTES_MS,
        Self::FIFTEEN_MINUTES_MS,
    ];

    pub fn from_millis(ms: u64) -> Result<Self, ConfigError> {
        NonZeroU64::new(ms)
            .map(Self)
            .ok_or(ConfigError::InvalidRefreshInterval(ms))
    }

    pub fn as_millis(&self) -> u64 {
        self.0.get()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0.get())
    }

    pub fn is_preset(&self) -> bool {
        Self::PRESETS.contains(&self.as_millis())
    }
}

const DEFAULT_REFRESH_MS: NonZeroU64 = match NonZeroU64::new(RefreshInterval::FIVE_MINUTES_MS) {
    Some(ms) => ms,
    None => panic!("default refresh interval must be non-zero"),
};

impl Default for RefreshInterval {
    fn default() -> Self {
        Self(DEFAULT_REFRESH_MS)
    }
}

impl TryFrom<u64> for RefreshInterval {
    type Error = ConfigError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Self::from_millis(ms)
    }
}

impl From<RefreshInterval> for u64 {
    fn from(interval: RefreshInterval) -> Self {
        interval.as_millis()
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub refresh_interval: RefreshInterval,
    pub fetch_timeout: Duration,
    pub fetch_max_retries: usize,
    pub port: u16,
    pub watchlist: Vec<String>,
    pub sectors: Vec<String>,
    pub jitter_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            alpha_vantage_base_url: DEFAULT_ALPHA_VANTAGE_URL.to_string(),
            refresh_interval: RefreshInterval::default(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            fetch_max_retries: DEFAULT_FETCH_MAX_RETRIES,
            port: DEFAULT_PORT,
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
            sectors: DEFAULT_SECTORS.iter().map(|s| s.to_string()).collect(),
            jitter_seed: None,
        }
    }
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.alpha_vantage_api_key = lookup("ALPHA_VANTAGE_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if let Some(url) = lookup("ALPHA_VANTAGE_BASE_URL") {
            config.alpha_vantage_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("REFRESH_INTERVAL_MS") {
            config.refresh_interval =
                RefreshInterval::from_millis(parse_var("REFRESH_INTERVAL_MS", &raw)?)?;
        }

        if let Some(raw) = lookup("FETCH_TIMEOUT_MS") {
            config.fetch_timeout = Duration::from_millis(parse_var("FETCH_TIMEOUT_MS", &raw)?);
        }

        if let Some(raw) = lookup("FETCH_MAX_RETRIES") {
            config.fetch_max_retries = parse_var("FETCH_MAX_RETRIES", &raw)?;
        }

        if let Some(raw) = lookup("PORT") {
            config.port = parse_var("PORT", &raw)?;
        }

        if let Some(raw) = lookup("WATCHLIST") {
            config.watchlist = split_list(&raw.to_uppercase());
        }

        if let Some(raw) = lookup("SECTORS") {
            config.sectors = split_list(&raw);
        }

        if let Some(raw) = lookup("JITTER_SEED") {
            config.jitter_seed = Some(parse_var("JITTER_SEED", &raw)?);
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}
