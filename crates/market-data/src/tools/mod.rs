//! Agent-facing tool surface.
//!
//! Exposes symbol search and market data aggregation as two named tools with
//! JSON-schema definitions, so an orchestration layer can register them and
//! dispatch model tool calls by name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregator::MarketDataAggregator;
use crate::errors::MarketDataError;
use crate::models::AssetClass;
use crate::resolver::SymbolResolver;

pub const SYMBOL_SEARCH_TOOL: &str = "symbol_search";
pub const FETCH_MARKET_DATA_TOOL: &str = "fetch_market_data";

// ============================================================================
// Tool Arguments and Definitions
// ============================================================================

/// Arguments for the symbol_search tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSearchArgs {
    /// Company name, ticker or asset name to look up.
    pub keywords: String,
}

/// Arguments for the fetch_market_data tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchMarketDataArgs {
    /// Stock or index ticker, or crypto pair such as "BTCUSD".
    pub symbol: String,

    #[serde(rename = "assetType", alias = "assetClass")]
    pub asset_class: AssetClass,
}

/// Definition handed to the model when registering a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// Both market data operations behind a name-based dispatcher.
pub struct MarketDataTools {
    resolver: SymbolResolver,
    aggregator: MarketDataAggregator,
}

impl MarketDataTools {
    pub fn new(resolver: SymbolResolver, aggregator: MarketDataAggregator) -> Self {
        Self {
            resolver,
            aggregator,
        }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: SYMBOL_SEARCH_TOOL.to_string(),
                description: "Search for a stock, index or cryptocurrency by name or ticker. Returned symbols are formatted for fetch_market_data, crypto symbols as pairs such as DOGEUSD.".to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "keywords": {
                            "type": "string",
                            "description": "Company name, ticker or asset name, e.g. 'apple' or 'doge'"
                        }
                    },
                    "required": ["keywords"]
                }),
            },
            ToolDefinition {
                name: FETCH_MARKET_DATA_TOOL.to_string(),
                description: "Get the current price and latest RSI, MACD, SMA, EMA, Bollinger Bands, Stochastic and OBV values for a symbol. Fields that could not be fetched are listed in errors.".to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Ticker for stocks and indices (e.g. 'AAPL', '^GSPC'); pair for crypto (e.g. 'BTCUSD')"
                        },
                        "assetType": {
                            "type": "string",
                            "enum": ["stock", "crypto", "index"],
                            "description": "The type of the asset"
                        }
                    },
                    "required": ["symbol", "assetType"]
                }),
            },
        ]
    }

    /// Run the tool called `name` with JSON `args` and return its JSON output.
    pub async fn call(&self, name: &str, args: Value) -> Result<Value, MarketDataError> {
        match name {
            SYMBOL_SEARCH_TOOL => {
                let args: SymbolSearchArgs = parse_args(name, args)?;
                let response = self.resolver.search(&args.keywords).await?;
                to_output(&response)
            }
            FETCH_MARKET_DATA_TOOL => {
                let args: FetchMarketDataArgs = parse_args(name, args)?;
                let record = self
                    .aggregator
                    .fetch_market_data(&args.symbol, args.asset_class)
                    .await?;
                to_output(&record)
            }
            other => Err(MarketDataError::validation(format!(
                "unknown tool '{}'",
                other
            ))),
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(tool: &str, args: Value) -> Result<T, MarketDataError> {
    serde_json::from_value(args)
        .map_err(|e| MarketDataError::validation(format!("invalid arguments for {}: {}", tool, e)))
}

fn to_output<T: Serialize>(output: &T) -> Result<Value, MarketDataError> {
    serde_json::to_value(output)
        .map_err(|e| MarketDataError::internal(format!("failed to serialize tool output: {}", e)))
}
