//! Upstream transport trait definitions.
//!
//! Every component reaches upstream through [`QuoteTransport`], so tests and
//! embedding applications can substitute the HTTP client.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;

/// One query against the upstream endpoint: a `function` selector plus its
/// operation-specific parameters, in order. The API key is not part of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamQuery {
    pub function: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamQuery {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Value of the first parameter called `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Transport to the upstream quote and indicator service.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tickerscope_market_data::provider::{QuoteTransport, UpstreamQuery};
///
/// struct CannedTransport(serde_json::Value);
///
/// #[async_trait]
/// impl QuoteTransport for CannedTransport {
///     async fn get(&self, _query: &UpstreamQuery) -> Result<serde_json::Value, MarketDataError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteTransport: Send + Sync {
    /// Send one query and return the decoded response envelope.
    ///
    /// Implementations apply their own per-request timeout and report network,
    /// timeout and HTTP status failures as [`MarketDataError::Transport`]. The
    /// envelope is returned unchecked.
    async fn get(&self, query: &UpstreamQuery) -> Result<Value, MarketDataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = UpstreamQuery::new("CURRENCY_EXCHANGE_RATE")
            .with_param("from_currency", "BTC")
            .with_param("to_currency", "USD");

        assert_eq!(query.function, "CURRENCY_EXCHANGE_RATE");
        assert_eq!(query.param("from_currency"), Some("BTC"));
        assert_eq!(query.param("to_currency"), Some("USD"));
        assert_eq!(query.param("symbol"), None);
    }
}
