//! Canonical symbols and asset classes.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Length of the settlement currency suffix on crypto symbols.
pub const QUOTE_CURRENCY_LEN: usize = 3;

lazy_static! {
    static ref STOCK_SYMBOL: Regex =
        Regex::new(r"^[A-Z]{1,5}$").expect("stock symbol pattern must be valid");
    static ref INDEX_SYMBOL: Regex =
        Regex::new(r"^[A-Z^.]{1,10}$").expect("index symbol pattern must be valid");
    static ref CRYPTO_SYMBOL: Regex =
        Regex::new(r"^[A-Z]{3,10}[A-Z]{3}$").expect("crypto symbol pattern must be valid");
}

/// Instrument category. Selects the upstream price endpoint and how the
/// symbol is decomposed before querying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stock,
    Crypto,
    Index,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stock => "stock",
            AssetClass::Crypto => "crypto",
            AssetClass::Index => "index",
        }
    }

    fn symbol_pattern(&self) -> &'static Regex {
        match self {
            AssetClass::Stock => &STOCK_SYMBOL,
            AssetClass::Crypto => &CRYPTO_SYMBOL,
            AssetClass::Index => &INDEX_SYMBOL,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(AssetClass::Stock),
            "crypto" => Ok(AssetClass::Crypto),
            "index" => Ok(AssetClass::Index),
            other => Err(MarketDataError::validation(format!(
                "unknown asset class '{}', expected stock, crypto or index",
                other
            ))),
        }
    }
}

/// Uppercase canonical identifier of a tradable instrument.
///
/// Construct through [`Symbol::parse`], which enforces the shape required by
/// the asset class.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Trim, uppercase and validate `raw` against the shape for `asset_class`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tickerscope_market_data::models::{AssetClass, Symbol};
    ///
    /// let symbol = Symbol::parse(" aapl ", AssetClass::Stock).unwrap();
    /// assert_eq!(symbol.as_str(), "AAPL");
    ///
    /// assert!(Symbol::parse("BTC", AssetClass::Crypto).is_err());
    /// ```
    pub fn parse(raw: &str, asset_class: AssetClass) -> Result<Self, MarketDataError> {
        let canonical = raw.trim().to_uppercase();
        if canonical.is_empty() {
            return Err(MarketDataError::validation("symbol must not be empty"));
        }
        if !asset_class.symbol_pattern().is_match(&canonical) {
            return Err(MarketDataError::validation(format!(
                "'{}' is not a valid {} symbol",
                canonical, asset_class
            )));
        }
        Ok(Symbol(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Upstream view of a validated symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryInstrument {
    /// Stocks and indices, queried by their canonical symbol.
    Listed { symbol: String },
    /// Crypto pair split into base asset and settlement currency.
    CryptoPair { base: String, quote: String },
}

impl QueryInstrument {
    /// Decompose a symbol for querying.
    pub fn from_symbol(symbol: &Symbol, asset_class: AssetClass) -> Self {
        let raw = symbol.as_str();
        match asset_class {
            AssetClass::Crypto => {
                // Shape validation guarantees an ASCII suffix of this length.
                let split = raw.len() - QUOTE_CURRENCY_LEN;
                QueryInstrument::CryptoPair {
                    base: raw[..split].to_string(),
                    quote: raw[split..].to_string(),
                }
            }
            AssetClass::Stock | AssetClass::Index => QueryInstrument::Listed {
                symbol: raw.to_string(),
            },
        }
    }

    /// Symbol passed to indicator requests.
    pub fn indicator_symbol(&self) -> &str {
        match self {
            QueryInstrument::Listed { symbol } => symbol,
            QueryInstrument::CryptoPair { base, .. } => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes() {
        let symbol = Symbol::parse("  msft\n", AssetClass::Stock).unwrap();
        assert_eq!(symbol.as_str(), "MSFT");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            Symbol::parse("   ", AssetClass::Stock),
            Err(MarketDataError::Validation { .. })
        ));
    }

    #[test]
    fn test_stock_shape() {
        assert!(Symbol::parse("A", AssetClass::Stock).is_ok());
        assert!(Symbol::parse("GOOGL", AssetClass::Stock).is_ok());
        assert!(Symbol::parse("TOOLONG", AssetClass::Stock).is_err());
        assert!(Symbol::parse("BRK.B", AssetClass::Stock).is_err());
        assert!(Symbol::parse("123", AssetClass::Stock).is_err());
    }

    #[test]
    fn test_index_shape() {
        assert!(Symbol::parse("^GSPC", AssetClass::Index).is_ok());
        assert!(Symbol::parse("^N225.X", AssetClass::Index).is_err());
        assert!(Symbol::parse("DJI", AssetClass::Index).is_ok());
        assert!(Symbol::parse("^ABCDEFGHIJ", AssetClass::Index).is_err());
    }

    #[test]
    fn test_crypto_shape() {
        assert!(Symbol::parse("btcusd", AssetClass::Crypto).is_ok());
        assert!(Symbol::parse("DOGEEUR", AssetClass::Crypto).is_ok());
        assert!(Symbol::parse("BTC", AssetClass::Crypto).is_err());
        assert!(Symbol::parse("BTCUS", AssetClass::Crypto).is_err());
        assert!(Symbol::parse("BTC-USD", AssetClass::Crypto).is_err());
    }

    #[test]
    fn test_crypto_decomposition() {
        let symbol = Symbol::parse("ETHUSD", AssetClass::Crypto).unwrap();
        let instrument = QueryInstrument::from_symbol(&symbol, AssetClass::Crypto);

        assert_eq!(
            instrument,
            QueryInstrument::CryptoPair {
                base: "ETH".to_string(),
                quote: "USD".to_string(),
            }
        );
        assert_eq!(instrument.indicator_symbol(), "ETH");
    }

    #[test]
    fn test_listed_passthrough() {
        let symbol = Symbol::parse("^GSPC", AssetClass::Index).unwrap();
        let instrument = QueryInstrument::from_symbol(&symbol, AssetClass::Index);

        assert_eq!(instrument.indicator_symbol(), "^GSPC");
    }

    #[test]
    fn test_asset_class_from_str() {
        assert_eq!("Stock".parse::<AssetClass>().unwrap(), AssetClass::Stock);
        assert_eq!(" CRYPTO ".parse::<AssetClass>().unwrap(), AssetClass::Crypto);
        assert_eq!("index".parse::<AssetClass>().unwrap(), AssetClass::Index);
        assert!("bond".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_asset_class_serde() {
        assert_eq!(
            serde_json::to_string(&AssetClass::Crypto).unwrap(),
            "\"crypto\""
        );
        let parsed: AssetClass = serde_json::from_str("\"index\"").unwrap();
        assert_eq!(parsed, AssetClass::Index);
    }
}
