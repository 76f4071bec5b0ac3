//! Technical indicator table.
//!
//! [`INDICATORS`] is the only place indicator families are described. The
//! aggregator iterates it to build requests and to reconcile responses, so a
//! new indicator is one new [`IndicatorSpec`] row plus its [`IndicatorKind`].
//!
//! Indicator values are fetched pre-computed from upstream. Nothing here
//! computes an indicator locally.

pub mod parsers;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::provider::UpstreamQuery;

/// Daily candles for every indicator request.
pub const INDICATOR_INTERVAL: &str = "daily";

/// Indicators are computed over closing prices.
pub const INDICATOR_SERIES_TYPE: &str = "close";

/// Indicator families, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Sma,
    Ema,
    BollingerBands,
    Stochastic,
    Obv,
}

impl IndicatorKind {
    /// Table row describing this indicator.
    pub fn spec(self) -> &'static IndicatorSpec {
        &INDICATORS[self as usize]
    }

    /// Upper-case label used in error messages.
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Field name in the serialized record.
    pub fn field(self) -> &'static str {
        self.spec().field
    }
}

/// Latest value of one indicator. The shape depends on the indicator family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Scalar(Decimal),
    Macd {
        macd: Decimal,
        signal: Decimal,
        hist: Decimal,
    },
    Bands {
        upper: Decimal,
        middle: Decimal,
        lower: Decimal,
    },
    Stochastic {
        #[serde(rename = "slowK")]
        slow_k: Decimal,
        #[serde(rename = "slowD")]
        slow_d: Decimal,
    },
}

/// Parser from the latest dated entry to a typed value. Returns `None` when
/// a required field is missing.
pub type EntryParser = fn(&Map<String, Value>) -> Option<IndicatorValue>;

/// Why an indicator series could not be turned into a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesGap {
    /// The envelope key is absent or holds no entries.
    NoData,
    /// The latest entry lacks a required field.
    Incomplete,
}

impl SeriesGap {
    pub fn reason(self) -> &'static str {
        match self {
            SeriesGap::NoData => "no data available",
            SeriesGap::Incomplete => "incomplete data",
        }
    }
}

/// Descriptor of one upstream indicator family.
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    /// Label used in error messages.
    pub label: &'static str,
    /// Field name in the serialized record.
    pub field: &'static str,
    /// Upstream `function` parameter.
    pub function: &'static str,
    /// Envelope key holding the dated series.
    pub envelope_key: &'static str,
    /// Indicator-specific request parameters.
    pub extra_params: &'static [(&'static str, &'static str)],
    pub parse: EntryParser,
}

impl IndicatorSpec {
    /// Build the request for `symbol` (the decomposed indicator symbol).
    pub fn query(&self, symbol: &str) -> UpstreamQuery {
        let query = UpstreamQuery::new(self.function)
            .with_param("symbol", symbol)
            .with_param("interval", INDICATOR_INTERVAL)
            .with_param("series_type", INDICATOR_SERIES_TYPE);

        self.extra_params
            .iter()
            .fold(query, |query, (name, value)| query.with_param(*name, *value))
    }

    /// Extract the latest value from a checked envelope payload.
    pub fn extract(&self, payload: &Map<String, Value>) -> Result<IndicatorValue, SeriesGap> {
        let series = payload
            .get(self.envelope_key)
            .and_then(Value::as_object)
            .filter(|series| !series.is_empty())
            .ok_or(SeriesGap::NoData)?;

        let entry = parsers::latest_entry(series).ok_or(SeriesGap::Incomplete)?;
        (self.parse)(entry).ok_or(SeriesGap::Incomplete)
    }
}

/// The indicator table. Row order is the reconciliation and output order.
pub static INDICATORS: [IndicatorSpec; 7] = [
    IndicatorSpec {
        kind: IndicatorKind::Rsi,
        label: "RSI",
        field: "rsi",
        function: "RSI",
        envelope_key: "Technical Analysis: RSI",
        extra_params: &[("time_period", "14")],
        parse: parsers::rsi,
    },
    IndicatorSpec {
        kind: IndicatorKind::Macd,
        label: "MACD",
        field: "macd",
        function: "MACD",
        envelope_key: "Technical Analysis: MACD",
        extra_params: &[],
        parse: parsers::macd,
    },
    IndicatorSpec {
        kind: IndicatorKind::Sma,
        label: "SMA",
        field: "sma",
        function: "SMA",
        envelope_key: "Technical Analysis: SMA",
        extra_params: &[("time_period", "50")],
        parse: parsers::sma,
    },
    IndicatorSpec {
        kind: IndicatorKind::Ema,
        label: "EMA",
        field: "ema",
        function: "EMA",
        envelope_key: "Technical Analysis: EMA",
        extra_params: &[("time_period", "20")],
        parse: parsers::ema,
    },
    IndicatorSpec {
        kind: IndicatorKind::BollingerBands,
        label: "BBANDS",
        field: "bollingerBands",
        function: "BBANDS",
        envelope_key: "Technical Analysis: BBANDS",
        extra_params: &[("time_period", "20")],
        parse: parsers::bbands,
    },
    IndicatorSpec {
        kind: IndicatorKind::Stochastic,
        label: "STOCH",
        field: "stoch",
        function: "STOCH",
        envelope_key: "Technical Analysis: STOCH",
        extra_params: &[],
        parse: parsers::stoch,
    },
    IndicatorSpec {
        kind: IndicatorKind::Obv,
        label: "OBV",
        field: "obv",
        function: "OBV",
        envelope_key: "Technical Analysis: OBV",
        extra_params: &[],
        parse: parsers::obv,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_table_matches_kind_order() {
        for (index, spec) in INDICATORS.iter().enumerate() {
            assert_eq!(spec.kind as usize, index, "row {} out of order", spec.label);
            assert_eq!(spec.kind.spec().function, spec.function);
        }
    }

    #[test]
    fn test_query_parameters() {
        let query = IndicatorKind::Sma.spec().query("AAPL");

        assert_eq!(query.function, "SMA");
        assert_eq!(query.param("symbol"), Some("AAPL"));
        assert_eq!(query.param("interval"), Some("daily"));
        assert_eq!(query.param("series_type"), Some("close"));
        assert_eq!(query.param("time_period"), Some("50"));
    }

    #[test]
    fn test_extract_latest_value() {
        let payload = json!({
            "Meta Data": { "1: Symbol": "AAPL" },
            "Technical Analysis: EMA": {
                "2024-01-12": { "EMA": "184.10" },
                "2024-01-15": { "EMA": "185.42" }
            }
        });
        let payload = payload.as_object().unwrap();

        let value = IndicatorKind::Ema.spec().extract(payload).unwrap();
        assert_eq!(value, IndicatorValue::Scalar(dec!(185.42)));
    }

    #[test]
    fn test_extract_reports_gaps() {
        let spec = IndicatorKind::Macd.spec();

        let missing = json!({ "Meta Data": {} });
        assert_eq!(spec.extract(missing.as_object().unwrap()), Err(SeriesGap::NoData));

        let empty = json!({ "Technical Analysis: MACD": {} });
        assert_eq!(spec.extract(empty.as_object().unwrap()), Err(SeriesGap::NoData));

        let partial = json!({ "Technical Analysis: MACD": { "2024-01-15": { "MACD": "1.0" } } });
        assert_eq!(spec.extract(partial.as_object().unwrap()), Err(SeriesGap::Incomplete));
    }

    #[test]
    fn test_value_serialization() {
        let scalar = IndicatorValue::Scalar(dec!(55.12));
        assert_eq!(serde_json::to_value(&scalar).unwrap(), json!("55.12"));

        let stoch = IndicatorValue::Stochastic {
            slow_k: dec!(80.2),
            slow_d: dec!(75.9),
        };
        assert_eq!(
            serde_json::to_value(&stoch).unwrap(),
            json!({ "slowK": "80.2", "slowD": "75.9" })
        );
    }
}
