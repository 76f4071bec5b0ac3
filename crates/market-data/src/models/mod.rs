//! Market data models
//!
//! This module contains the data types shared by the resolver and aggregator:
//! - `symbol` - Canonical symbols, asset classes and their upstream decomposition
//! - `record` - The aggregated price and indicator record (MarketDataRecord)
//! - `search` - Search result data (SearchResult, SearchResponse)

mod record;
mod search;
mod symbol;

pub use record::{FetchOutcome, MarketDataRecord};
pub use search::{SearchResponse, SearchResult};
pub use symbol::{AssetClass, QueryInstrument, Symbol, QUOTE_CURRENCY_LEN};
