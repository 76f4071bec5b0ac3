//! Alpha Vantage HTTP transport.
//!
//! One query-string endpoint serves every function this crate uses:
//! - Prices via GLOBAL_QUOTE (stocks, indices) and CURRENCY_EXCHANGE_RATE (crypto)
//! - Technical indicators via their function names (RSI, MACD, ...)
//! - Keyword search via SYMBOL_SEARCH
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute.

pub mod envelope;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

use crate::config::MarketDataConfig;
use crate::errors::{MarketDataError, TransportFailureKind};
use crate::provider::{QuoteTransport, UpstreamQuery, PROVIDER_ID};

pub use envelope::check_envelope;

const API_KEY_PARAM: &str = "apikey";

/// Alpha Vantage client implementing [`QuoteTransport`].
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl AlphaVantageClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be created.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        Url::parse(&config.base_url).map_err(|e| {
            MarketDataError::validation(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| MarketDataError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
        })
    }

    /// Build the request URL, API key included.
    fn url_for(&self, query: &UpstreamQuery) -> Result<Url, MarketDataError> {
        let mut params: Vec<(&str, &str)> = Vec::with_capacity(query.params.len() + 2);
        params.push(("function", query.function.as_str()));
        params.extend(
            query
                .params
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        params.push((API_KEY_PARAM, self.api_key.as_str()));

        Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| MarketDataError::internal(format!("Failed to build URL: {}", e)))
    }

    /// Render the URL for logging with the key value replaced.
    fn masked(url: &Url) -> String {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(name, value)| {
                let value = if name == API_KEY_PARAM {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (name.into_owned(), value)
            })
            .collect();

        let mut masked = url.clone();
        masked.query_pairs_mut().clear().extend_pairs(&pairs);
        masked.to_string()
    }

    fn transport_error(kind: TransportFailureKind, error: impl ToString) -> MarketDataError {
        MarketDataError::transport(PROVIDER_ID, kind, error.to_string())
    }
}

#[async_trait]
impl QuoteTransport for AlphaVantageClient {
    async fn get(&self, query: &UpstreamQuery) -> Result<Value, MarketDataError> {
        let url = self.url_for(query)?;
        debug!("Alpha Vantage request: {}", Self::masked(&url));

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Self::transport_error(TransportFailureKind::Timeout, e)
                } else {
                    Self::transport_error(TransportFailureKind::Connect, e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::rate_limited(
                PROVIDER_ID,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        if !status.is_success() {
            return Err(Self::transport_error(
                TransportFailureKind::Status(status.as_u16()),
                format!("HTTP {}", status),
            ));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                Self::transport_error(TransportFailureKind::Timeout, e)
            } else {
                Self::transport_error(TransportFailureKind::Decode, e)
            }
        })
    }
}
