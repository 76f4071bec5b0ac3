//! Symbol resolution from free-text keywords.
//!
//! [`SymbolResolver::search`] sends one keyword search upstream, drops
//! malformed matches, normalizes asset types and symbols, then filters and
//! ranks the candidates against the query.
//!
//! # Output
//!
//! Each [`SearchResult`] carries a formatted symbol and asset class that are
//! valid input for [`MarketDataAggregator::fetch_market_data`](crate::MarketDataAggregator::fetch_market_data).

pub mod asset_types;
pub mod ranking;

use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::{AssetClass, SearchResponse, SearchResult};
use crate::provider::alpha_vantage::envelope::{check_envelope, BEST_MATCHES_KEY};
use crate::provider::{AlphaVantageClient, QuoteTransport, UpstreamQuery};
use crate::retry::retry_with_backoff;

pub use asset_types::classify;
pub use ranking::{rank, Candidate, MatchTier};

const SEARCH_FUNCTION: &str = "SYMBOL_SEARCH";

const MATCH_SYMBOL: &str = "1. symbol";
const MATCH_NAME: &str = "2. name";
const MATCH_TYPE: &str = "3. type";
const MATCH_REGION: &str = "4. region";

/// Resolves keywords to canonical symbols.
pub struct SymbolResolver {
    transport: Arc<dyn QuoteTransport>,
    config: Arc<MarketDataConfig>,
}

impl SymbolResolver {
    pub fn new(transport: Arc<dyn QuoteTransport>, config: Arc<MarketDataConfig>) -> Self {
        Self { transport, config }
    }

    /// Create a resolver backed by the Alpha Vantage HTTP client.
    pub fn from_config(config: MarketDataConfig) -> Result<Self, MarketDataError> {
        let transport = AlphaVantageClient::new(&config)?;
        Ok(Self::new(Arc::new(transport), Arc::new(config)))
    }

    /// Search upstream for `keywords` and return ranked candidates.
    ///
    /// # Errors
    ///
    /// - `Validation` for empty or overlong keywords
    /// - `RateLimited` / `Upstream` when the envelope carries a marker
    /// - `Transport` once the retry budget is spent
    ///
    /// An empty or malformed match list is not an error.
    pub async fn search(&self, keywords: &str) -> Result<SearchResponse, MarketDataError> {
        let query = validate_keywords(keywords, self.config.max_keywords_len)?;
        debug!("Searching Alpha Vantage for '{}'", query);

        let request = UpstreamQuery::new(SEARCH_FUNCTION).with_param("keywords", query);
        let body = retry_with_backoff(&self.config.search_retry, SEARCH_FUNCTION, || {
            self.transport.get(&request)
        })
        .await?;
        let payload = check_envelope(&body)?;

        let matches = match payload.get(BEST_MATCHES_KEY).and_then(Value::as_array) {
            Some(matches) if !matches.is_empty() => matches,
            _ => {
                debug!("No matches for '{}'", query);
                return Ok(SearchResponse::empty(query));
            }
        };

        let candidates: Vec<Candidate> = matches
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|raw| self.candidate_from_match(raw))
            .collect();

        let ranked = rank(candidates, query);
        let total_found = ranked.len();
        let results: Vec<SearchResult> = ranked
            .into_iter()
            .take(self.config.max_search_results)
            .map(|candidate| candidate.result)
            .collect();

        debug!(
            "Search '{}' returned {} of {} relevant matches",
            query,
            results.len(),
            total_found
        );

        Ok(SearchResponse {
            results,
            query: query.to_string(),
            total_found,
        })
    }

    /// Build a candidate from one raw match. Matches missing any required
    /// field are dropped.
    fn candidate_from_match(&self, raw: &Map<String, Value>) -> Option<Candidate> {
        let raw_symbol = required_field(raw, MATCH_SYMBOL)?;
        let name = required_field(raw, MATCH_NAME)?;
        let asset_type = required_field(raw, MATCH_TYPE)?;
        let region = required_field(raw, MATCH_REGION)?;

        let asset_class = classify(asset_type);
        let symbol = format_symbol(raw_symbol, asset_class, &self.config.default_quote_currency);

        Some(Candidate {
            raw_symbol: raw_symbol.to_string(),
            result: SearchResult::new(symbol, name, asset_class, asset_type, region),
        })
    }
}

fn required_field<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Trim and bound the search keywords.
pub fn validate_keywords(keywords: &str, max_len: usize) -> Result<&str, MarketDataError> {
    let trimmed = keywords.trim();
    if trimmed.is_empty() {
        return Err(MarketDataError::validation("search keywords must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(MarketDataError::validation(format!(
            "search keywords must be at most {} characters",
            max_len
        )));
    }
    Ok(trimmed)
}

/// Uppercase a symbol, appending `quote_currency` to crypto symbols that lack it.
pub fn format_symbol(raw: &str, asset_class: AssetClass, quote_currency: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    match asset_class {
        AssetClass::Crypto if !symbol.ends_with(quote_currency) => {
            format!("{}{}", symbol, quote_currency)
        }
        _ => symbol,
    }
}
