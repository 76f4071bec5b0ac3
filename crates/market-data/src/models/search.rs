//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

use super::AssetClass;

/// One resolved search candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Formatted symbol (e.g., "AAPL", "DOGEUSD")
    pub symbol: String,

    /// Display name (e.g., "Apple Inc")
    pub name: String,

    /// Normalized asset class
    #[serde(rename = "type")]
    pub asset_class: AssetClass,

    /// Asset type label as reported upstream (e.g., "Equity", "Cryptocurrency")
    pub asset_type: String,

    /// Region (e.g., "United States")
    pub region: String,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_class: AssetClass,
        asset_type: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            asset_class,
            asset_type: asset_type.into(),
            region: region.into(),
        }
    }
}

/// Ranked results of one search call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,

    /// Trimmed keywords the search ran with
    pub query: String,

    /// Relevant candidates before truncation
    pub total_found: usize,
}

impl SearchResponse {
    /// Response for a search that matched nothing.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            query: query.into(),
            total_found: 0,
        }
    }
}
