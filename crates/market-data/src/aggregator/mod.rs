//! Concurrent price and indicator aggregation.
//!
//! [`MarketDataAggregator::fetch_market_data`] issues one price request and
//! one request per [`INDICATORS`] row, waits for all of them to settle, then
//! reconciles the results in table order. A failed request never cancels its
//! siblings and never fails the whole call: it becomes an entry in the
//! record's error list.
//!
//! All requests run on the calling task. Retries are local to each request.

mod reconcile;

use std::sync::Arc;

use futures::future::join_all;
use log::debug;
use serde_json::Value;

use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::indicators::INDICATORS;
use crate::models::{AssetClass, MarketDataRecord, QueryInstrument, Symbol};
use crate::provider::{AlphaVantageClient, QuoteTransport, UpstreamQuery};
use crate::retry::retry_with_backoff;

/// Fetches a price quote plus every table indicator for one symbol.
pub struct MarketDataAggregator {
    transport: Arc<dyn QuoteTransport>,
    config: Arc<MarketDataConfig>,
}

impl MarketDataAggregator {
    /// Create an aggregator over an explicit transport.
    pub fn new(transport: Arc<dyn QuoteTransport>, config: Arc<MarketDataConfig>) -> Self {
        Self { transport, config }
    }

    /// Create an aggregator backed by the Alpha Vantage HTTP client.
    pub fn from_config(config: MarketDataConfig) -> Result<Self, MarketDataError> {
        let transport = AlphaVantageClient::new(&config)?;
        Ok(Self::new(Arc::new(transport), Arc::new(config)))
    }

    /// Fetch the price and latest indicator values for `symbol`.
    ///
    /// # Errors
    ///
    /// Only an empty symbol or one that does not match the shape required by
    /// `asset_class` is an error. Individual upstream failures are reported
    /// through [`MarketDataRecord::errors`].
    #[tracing::instrument(skip(self))]
    pub async fn fetch_market_data(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<MarketDataRecord, MarketDataError> {
        let symbol = Symbol::parse(symbol, asset_class)?;
        let instrument = QueryInstrument::from_symbol(&symbol, asset_class);

        let price_query = price_query(&instrument);
        let indicator_queries: Vec<UpstreamQuery> = INDICATORS
            .iter()
            .map(|spec| spec.query(instrument.indicator_symbol()))
            .collect();

        debug!(
            "Fetching price and {} indicators for {} ({})",
            indicator_queries.len(),
            symbol,
            asset_class
        );

        let (price, indicators) = futures::join!(
            self.send(&price_query),
            join_all(indicator_queries.iter().map(|query| self.send(query)))
        );

        let mut record = MarketDataRecord::new(symbol, asset_class);
        reconcile::apply_price(&mut record, price, self.config.price_scale(asset_class));
        for (spec, settled) in INDICATORS.iter().zip(indicators) {
            reconcile::apply_indicator(&mut record, spec, settled);
        }

        debug!(
            "Fetched {} with outcome {:?} ({} errors)",
            record.symbol(),
            record.outcome(),
            record.errors().len()
        );

        Ok(record)
    }

    /// Send one query with the fetch retry policy.
    async fn send(&self, query: &UpstreamQuery) -> Result<Value, MarketDataError> {
        retry_with_backoff(&self.config.fetch_retry, &query.function, || {
            self.transport.get(query)
        })
        .await
    }
}

/// Price request: an exchange rate for crypto pairs, a quote otherwise.
fn price_query(instrument: &QueryInstrument) -> UpstreamQuery {
    match instrument {
        QueryInstrument::CryptoPair { base, quote } => UpstreamQuery::new("CURRENCY_EXCHANGE_RATE")
            .with_param("from_currency", base.as_str())
            .with_param("to_currency", quote.as_str()),
        QueryInstrument::Listed { symbol } => {
            UpstreamQuery::new("GLOBAL_QUOTE").with_param("symbol", symbol.as_str())
        }
    }
}
