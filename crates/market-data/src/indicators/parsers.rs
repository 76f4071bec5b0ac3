//! Field parsers applied to the most recent dated entry of an indicator series.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::IndicatorValue;

/// Read a numeric field. Upstream sends numbers as strings; a value that is
/// not a decimal counts as missing.
pub fn decimal_field(entry: &Map<String, Value>, name: &str) -> Option<Decimal> {
    match entry.get(name)? {
        Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        _ => None,
    }
}

/// Select the entry with the greatest date key. Keys are ISO dates, so
/// lexicographic order is chronological order.
pub fn latest_entry(series: &Map<String, Value>) -> Option<&Map<String, Value>> {
    series
        .iter()
        .max_by(|(left, _), (right, _)| left.cmp(right))
        .and_then(|(_, entry)| entry.as_object())
}

pub fn rsi(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    decimal_field(entry, "RSI").map(IndicatorValue::Scalar)
}

pub fn macd(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    Some(IndicatorValue::Macd {
        macd: decimal_field(entry, "MACD")?,
        signal: decimal_field(entry, "MACD_Signal")?,
        hist: decimal_field(entry, "MACD_Hist")?,
    })
}

pub fn sma(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    decimal_field(entry, "SMA").map(IndicatorValue::Scalar)
}

pub fn ema(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    decimal_field(entry, "EMA").map(IndicatorValue::Scalar)
}

pub fn bbands(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    Some(IndicatorValue::Bands {
        upper: decimal_field(entry, "Real_Upper_Band")?,
        middle: decimal_field(entry, "Real_Middle_Band")?,
        lower: decimal_field(entry, "Real_Lower_Band")?,
    })
}

pub fn stoch(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    Some(IndicatorValue::Stochastic {
        slow_k: decimal_field(entry, "SlowK")?,
        slow_d: decimal_field(entry, "SlowD")?,
    })
}

pub fn obv(entry: &Map<String, Value>) -> Option<IndicatorValue> {
    decimal_field(entry, "OBV").map(IndicatorValue::Scalar)
}
