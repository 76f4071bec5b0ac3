//! Alpha Vantage response envelope inspection.
//!
//! Every response is an object keyed by human-readable labels. Error and
//! throttling markers can replace the payload on any function, so they are
//! checked before the payload is trusted.

use log::warn;
use serde_json::{Map, Value};

use crate::errors::MarketDataError;
use crate::provider::PROVIDER_ID;

/// Hard upstream error marker.
pub const ERROR_MESSAGE_KEY: &str = "Error Message";
/// Rate-limit marker.
pub const NOTE_KEY: &str = "Note";
/// Informational marker, used for rate limits and premium-only notices.
pub const INFORMATION_KEY: &str = "Information";

/// Price envelope for `GLOBAL_QUOTE`.
pub const GLOBAL_QUOTE_KEY: &str = "Global Quote";
pub const GLOBAL_QUOTE_PRICE: &str = "05. price";

/// Price envelope for `CURRENCY_EXCHANGE_RATE`.
pub const EXCHANGE_RATE_KEY: &str = "Realtime Currency Exchange Rate";
pub const EXCHANGE_RATE_PRICE: &str = "5. Exchange Rate";

/// Match list for `SYMBOL_SEARCH`.
pub const BEST_MATCHES_KEY: &str = "bestMatches";

/// Verify `body` carries no error or throttling marker and return its payload.
pub fn check_envelope(body: &Value) -> Result<&Map<String, Value>, MarketDataError> {
    let envelope = body
        .as_object()
        .ok_or_else(|| MarketDataError::upstream(PROVIDER_ID, "response is not a JSON object"))?;

    if let Some(message) = marker(envelope, ERROR_MESSAGE_KEY) {
        return Err(MarketDataError::upstream(PROVIDER_ID, message));
    }

    if let Some(note) = marker(envelope, NOTE_KEY) {
        return Err(MarketDataError::rate_limited(PROVIDER_ID, note));
    }

    if let Some(information) = marker(envelope, INFORMATION_KEY) {
        if mentions_rate_limit(information) {
            return Err(MarketDataError::rate_limited(PROVIDER_ID, information));
        }
        warn!("Alpha Vantage info: {}", information);
        return Err(MarketDataError::upstream(PROVIDER_ID, information));
    }

    Ok(envelope)
}

fn marker<'a>(envelope: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    envelope
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn mentions_rate_limit(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("api call frequency")
        || lowered.contains("rate limit")
        || lowered.contains("requests per day")
}
