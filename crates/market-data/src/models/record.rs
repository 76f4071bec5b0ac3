//! Aggregated market data record.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{AssetClass, Symbol};
use crate::indicators::{IndicatorKind, IndicatorValue};

/// How much of a record was retrieved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Price and every indicator are present.
    Complete,
    /// Some data is present, some is listed in `errors`.
    Partial,
    /// Nothing was retrieved. Every field is listed in `errors`.
    Unavailable,
}

/// Price plus latest indicator values for one symbol.
///
/// Every datum that could not be retrieved has exactly one entry in
/// [`errors`](Self::errors). The record itself is never absent, only degraded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketDataRecord {
    symbol: Symbol,
    asset_class: AssetClass,
    price: Option<Decimal>,
    indicators: BTreeMap<IndicatorKind, IndicatorValue>,
    errors: Vec<String>,
}

impl MarketDataRecord {
    /// Create an empty record for a canonical symbol.
    pub fn new(symbol: Symbol, asset_class: AssetClass) -> Self {
        Self {
            symbol,
            asset_class,
            price: None,
            indicators: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn indicator(&self, kind: IndicatorKind) -> Option<&IndicatorValue> {
        self.indicators.get(&kind)
    }

    /// Indicators present in the record, in table order.
    pub fn indicators(&self) -> impl Iterator<Item = (IndicatorKind, &IndicatorValue)> {
        self.indicators.iter().map(|(kind, value)| (*kind, value))
    }

    /// Error entries, in table order. Empty when every datum was retrieved.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.price = Some(price);
    }

    pub fn set_indicator(&mut self, kind: IndicatorKind, value: IndicatorValue) {
        self.indicators.insert(kind, value);
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn outcome(&self) -> FetchOutcome {
        if self.errors.is_empty() {
            FetchOutcome::Complete
        } else if self.price.is_none() && self.indicators.is_empty() {
            FetchOutcome::Unavailable
        } else {
            FetchOutcome::Partial
        }
    }
}

impl Serialize for MarketDataRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("symbol", &self.symbol)?;
        map.serialize_entry("assetClass", &self.asset_class)?;
        if let Some(price) = &self.price {
            map.serialize_entry("price", price)?;
        }
        for (kind, value) in &self.indicators {
            map.serialize_entry(kind.field(), value)?;
        }
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        map.end()
    }
}
