//! Tickerscope Market Data Crate
//!
//! This crate resolves free-text queries to canonical trading symbols and
//! fetches a price quote plus a fixed set of technical indicators for a
//! symbol from a single upstream quote service (Alpha Vantage).
//!
//! # Overview
//!
//! The market data crate supports:
//! - Three asset classes: stocks, crypto pairs, indices
//! - Keyword search with asset type normalization and relevance ranking
//! - Concurrent fan-out of one price and seven indicator requests
//! - Partial results: failed fields are reported, never fatal
//! - Per-request timeouts and linear retry backoff
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   Caller / Agent |  (tools::MarketDataTools or direct calls)
//! +------------------+
//!        |                         |
//!        v                         v
//! +----------------+      +----------------------+
//! | SymbolResolver |      | MarketDataAggregator |
//! +----------------+      +----------------------+
//!        |                  |  1 price + 7 indicators, settle-all
//!        |                  v
//!        |          +----------------+
//!        |          |   INDICATORS   |  (table-driven requests and parsers)
//!        |          +----------------+
//!        v                  v
//! +--------------------------------------+
//! | retry_with_backoff + QuoteTransport  |  (AlphaVantageClient over reqwest)
//! +--------------------------------------+
//!                   |
//!                   v
//! +--------------------------------------+
//! | check_envelope / reconciliation      |  (MarketDataRecord, SearchResponse)
//! +--------------------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`SymbolResolver`] - Keyword search and ranking
//! - [`MarketDataAggregator`] - Concurrent price and indicator fetch
//! - [`MarketDataRecord`] - Aggregated result with per-field error list
//! - [`IndicatorSpec`] - One row of the indicator table
//! - [`QuoteTransport`] - Upstream seam, implemented by [`AlphaVantageClient`]
//! - [`MarketDataConfig`] - Immutable configuration captured at construction

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod indicators;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod retry;
pub mod tools;

pub use aggregator::MarketDataAggregator;
pub use config::MarketDataConfig;
pub use errors::{MarketDataError, RetryClass, TransportFailureKind};
pub use indicators::{IndicatorKind, IndicatorSpec, IndicatorValue, INDICATORS};
pub use models::{
    AssetClass, FetchOutcome, MarketDataRecord, QueryInstrument, SearchResponse, SearchResult,
    Symbol,
};
pub use provider::{AlphaVantageClient, QuoteTransport, UpstreamQuery, PROVIDER_ID};
pub use resolver::SymbolResolver;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use tools::{MarketDataTools, ToolDefinition};
