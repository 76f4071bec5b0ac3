//! Immutable configuration captured by the resolver and aggregator.
//!
//! Loading the values (environment, secret store, settings UI) belongs to the
//! embedding application; [`MarketDataConfig::from_env`] covers the common
//! case of a process configured through environment variables.

use std::fmt;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::AssetClass;
use crate::provider::PROVIDER_ID;
use crate::retry::RetryPolicy;

/// Default upstream endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Environment variable overriding the upstream endpoint.
pub const BASE_URL_ENV: &str = "ALPHA_VANTAGE_BASE_URL";

/// Environment variable overriding the per-request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "MARKET_DATA_TIMEOUT_SECS";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const FETCH_MAX_RETRIES: u32 = 3;
const SEARCH_MAX_RETRIES: u32 = 2;
const MAX_SEARCH_RESULTS: usize = 10;
const MAX_KEYWORDS_LEN: usize = 100;
const DEFAULT_QUOTE_CURRENCY: &str = "USD";
const EQUITY_PRICE_SCALE: u32 = 2;
const CRYPTO_PRICE_SCALE: u32 = 8;

/// Configuration for the market data components.
#[derive(Clone)]
pub struct MarketDataConfig {
    /// Upstream API key, appended to every request.
    pub api_key: String,
    /// Upstream query endpoint.
    pub base_url: String,
    /// Independent timeout applied to every upstream request.
    pub request_timeout: Duration,
    /// Retry policy for the aggregator's price and indicator requests.
    pub fetch_retry: RetryPolicy,
    /// Retry policy for the resolver's search request.
    pub search_retry: RetryPolicy,
    /// Number of ranked search results returned.
    pub max_search_results: usize,
    /// Upper bound on search keyword length, in characters.
    pub max_keywords_len: usize,
    /// Settlement currency appended to crypto search results.
    pub default_quote_currency: String,
    /// Decimal places kept for stock and index prices.
    pub equity_price_scale: u32,
    /// Decimal places kept for crypto exchange rates.
    pub crypto_price_scale: u32,
}

impl MarketDataConfig {
    /// Create a configuration with default settings and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fetch_retry: RetryPolicy::linear(FETCH_MAX_RETRIES, DEFAULT_RETRY_INTERVAL),
            search_retry: RetryPolicy::linear(SEARCH_MAX_RETRIES, DEFAULT_RETRY_INTERVAL),
            max_search_results: MAX_SEARCH_RESULTS,
            max_keywords_len: MAX_KEYWORDS_LEN,
            default_quote_currency: DEFAULT_QUOTE_CURRENCY.to_string(),
            equity_price_scale: EQUITY_PRICE_SCALE,
            crypto_price_scale: CRYPTO_PRICE_SCALE,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// `ALPHA_VANTAGE_API_KEY` is required. `ALPHA_VANTAGE_BASE_URL` and
    /// `MARKET_DATA_TIMEOUT_SECS` are optional overrides.
    pub fn from_env() -> Result<Self, MarketDataError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MarketDataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| MarketDataError::MissingApiKey(PROVIDER_ID.to_string()))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let seconds: u64 = raw.trim().parse().map_err(|_| {
                MarketDataError::validation(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_ENV, raw
                ))
            })?;
            if seconds == 0 {
                return Err(MarketDataError::validation(format!(
                    "{} must be greater than zero",
                    TIMEOUT_ENV
                )));
            }
            config.request_timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }

    /// Override the upstream endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the aggregator retry policy.
    pub fn with_fetch_retry(mut self, policy: RetryPolicy) -> Self {
        self.fetch_retry = policy;
        self
    }

    /// Override the resolver retry policy.
    pub fn with_search_retry(mut self, policy: RetryPolicy) -> Self {
        self.search_retry = policy;
        self
    }

    /// Decimal places used when normalizing a price for the asset class.
    pub fn price_scale(&self, asset_class: AssetClass) -> u32 {
        match asset_class {
            AssetClass::Crypto => self.crypto_price_scale,
            AssetClass::Stock | AssetClass::Index => self.equity_price_scale,
        }
    }
}

impl fmt::Debug for MarketDataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("fetch_retry", &self.fetch_retry)
            .field("search_retry", &self.search_retry)
            .field("max_search_results", &self.max_search_results)
            .field("max_keywords_len", &self.max_keywords_len)
            .field("default_quote_currency", &self.default_quote_currency)
            .field("equity_price_scale", &self.equity_price_scale)
            .field("crypto_price_scale", &self.crypto_price_scale)
            .finish()
    }
}
