//! Turning settled upstream results into record fields or error entries.

use log::warn;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::indicators::{parsers, IndicatorSpec, IndicatorValue};
use crate::models::{AssetClass, MarketDataRecord};
use crate::provider::alpha_vantage::envelope::{
    check_envelope, EXCHANGE_RATE_KEY, EXCHANGE_RATE_PRICE, GLOBAL_QUOTE_KEY, GLOBAL_QUOTE_PRICE,
};

const PRICE_LABEL: &str = "Price";

/// Why a field is missing from the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Degradation {
    /// The request never produced a response.
    Transport,
    /// Upstream answered with an error or throttling marker.
    Upstream(String),
    /// The envelope was clean but the expected data was not there.
    NoData(&'static str),
}

impl Degradation {
    fn from_error(error: &MarketDataError) -> Self {
        match error {
            MarketDataError::Transport { .. } => Degradation::Transport,
            MarketDataError::RateLimited { note, .. } => {
                Degradation::Upstream(format!("rate limited: {}", note))
            }
            MarketDataError::Upstream { message, .. } => Degradation::Upstream(message.clone()),
            other => Degradation::Upstream(other.to_string()),
        }
    }

    /// Error-list entry for the field labelled `label`.
    pub(crate) fn message(&self, label: &str) -> String {
        match self {
            Degradation::Transport => format!("{} data unavailable", label),
            Degradation::Upstream(reason) => format!("{} data unavailable ({})", label, reason),
            Degradation::NoData(reason) => format!("{} data unavailable ({})", label, reason),
        }
    }
}

/// Round half away from zero and pad to exactly `scale` places.
pub(crate) fn normalize_price(price: Decimal, scale: u32) -> Decimal {
    let mut normalized = price.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    normalized.rescale(scale);
    normalized
}

fn extract_price(body: &Value, asset_class: AssetClass, scale: u32) -> Result<Decimal, Degradation> {
    let payload = check_envelope(body).map_err(|e| Degradation::from_error(&e))?;

    let (quote_key, price_key) = match asset_class {
        AssetClass::Crypto => (EXCHANGE_RATE_KEY, EXCHANGE_RATE_PRICE),
        AssetClass::Stock | AssetClass::Index => (GLOBAL_QUOTE_KEY, GLOBAL_QUOTE_PRICE),
    };

    let quote = payload
        .get(quote_key)
        .and_then(Value::as_object)
        .filter(|quote| !quote.is_empty())
        .ok_or(Degradation::NoData("no data available"))?;

    if !quote.contains_key(price_key) {
        return Err(Degradation::NoData("no data available"));
    }

    parsers::decimal_field(quote, price_key)
        .map(|price| normalize_price(price, scale))
        .ok_or(Degradation::NoData("invalid price"))
}

fn extract_indicator(body: &Value, spec: &IndicatorSpec) -> Result<IndicatorValue, Degradation> {
    let payload = check_envelope(body).map_err(|e| Degradation::from_error(&e))?;
    spec.extract(payload)
        .map_err(|gap| Degradation::NoData(gap.reason()))
}

/// Fold the settled price request into `record`.
pub(crate) fn apply_price(
    record: &mut MarketDataRecord,
    settled: Result<Value, MarketDataError>,
    scale: u32,
) {
    let asset_class = record.asset_class();
    let outcome = settled
        .map_err(|e| Degradation::from_error(&e))
        .and_then(|body| extract_price(&body, asset_class, scale));

    match outcome {
        Ok(price) => record.set_price(price),
        Err(degradation) => {
            warn!(
                "Could not fetch price for {}: {:?}",
                record.symbol(),
                degradation
            );
            record.push_error(degradation.message(PRICE_LABEL));
        }
    }
}

/// Fold one settled indicator request into `record`.
pub(crate) fn apply_indicator(
    record: &mut MarketDataRecord,
    spec: &IndicatorSpec,
    settled: Result<Value, MarketDataError>,
) {
    let outcome = settled
        .map_err(|e| Degradation::from_error(&e))
        .and_then(|body| extract_indicator(&body, spec));

    match outcome {
        Ok(value) => record.set_indicator(spec.kind, value),
        Err(degradation) => {
            warn!(
                "Could not fetch {} for {}: {:?}",
                spec.label,
                record.symbol(),
                degradation
            );
            record.push_error(degradation.message(spec.label));
        }
    }
}
