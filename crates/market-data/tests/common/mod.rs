//! Scripted upstream transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tickerscope_market_data::errors::{MarketDataError, TransportFailureKind};
use tickerscope_market_data::{
    MarketDataAggregator, MarketDataConfig, QuoteTransport, RetryPolicy, SymbolResolver,
    UpstreamQuery,
};

/// Canned reply for one upstream function.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(Value),
    Fail(TransportFailureKind),
}

/// Transport answering by `function` and recording every query it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<UpstreamQuery>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, function: &str, reply: Reply) -> Self {
        self.replies.insert(function.to_string(), reply);
        self
    }

    pub fn json(self, function: &str, body: Value) -> Self {
        self.reply(function, Reply::Json(body))
    }

    pub fn fail(self, function: &str, kind: TransportFailureKind) -> Self {
        self.reply(function, Reply::Fail(kind))
    }

    /// Hold every reply for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Largest number of queries observed in progress at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<UpstreamQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, function: &str) -> Vec<UpstreamQuery> {
        self.calls()
            .into_iter()
            .filter(|query| query.function == function)
            .collect()
    }
}

#[async_trait]
impl QuoteTransport for ScriptedTransport {
    async fn get(&self, query: &UpstreamQuery) -> Result<Value, MarketDataError> {
        self.calls.lock().unwrap().push(query.clone());

        if let Some(delay) = self.delay {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        match self.replies.get(&query.function) {
            Some(Reply::Json(body)) => Ok(body.clone()),
            Some(Reply::Fail(kind)) => Err(MarketDataError::transport(
                "SCRIPTED",
                *kind,
                format!("scripted {} failure", kind),
            )),
            None => Err(MarketDataError::transport(
                "SCRIPTED",
                TransportFailureKind::Status(404),
                format!("no reply scripted for {}", query.function),
            )),
        }
    }
}

/// Configuration with fast retries for tests.
pub fn test_config() -> MarketDataConfig {
    MarketDataConfig::new("test-key")
        .with_fetch_retry(RetryPolicy::linear(3, Duration::from_millis(1)))
        .with_search_retry(RetryPolicy::linear(2, Duration::from_millis(1)))
}

pub fn aggregator(transport: &Arc<ScriptedTransport>) -> MarketDataAggregator {
    MarketDataAggregator::new(transport.clone(), Arc::new(test_config()))
}

pub fn resolver(transport: &Arc<ScriptedTransport>) -> SymbolResolver {
    SymbolResolver::new(transport.clone(), Arc::new(test_config()))
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn global_quote(price: &str) -> Value {
    json!({
        "Global Quote": {
            "01. symbol": "AAPL",
            "05. price": price,
            "07. latest trading day": "2024-01-15"
        }
    })
}

pub fn exchange_rate(rate: &str) -> Value {
    json!({
        "Realtime Currency Exchange Rate": {
            "1. From_Currency Code": "BTC",
            "3. To_Currency Code": "USD",
            "5. Exchange Rate": rate
        }
    })
}

/// Series with an older and a newer entry; the newer one carries `latest`.
fn series(key: &str, older: Value, latest: Value) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("Meta Data".to_string(), json!({ "1: Symbol": "AAPL" }));
    body.insert(
        key.to_string(),
        json!({ "2024-01-12": older, "2024-01-15": latest }),
    );
    Value::Object(body)
}

pub fn rsi() -> Value {
    series("Technical Analysis: RSI", json!({ "RSI": "48.2000" }), json!({ "RSI": "55.1234" }))
}

pub fn macd() -> Value {
    series(
        "Technical Analysis: MACD",
        json!({ "MACD": "1.0", "MACD_Signal": "0.9", "MACD_Hist": "0.1" }),
        json!({ "MACD": "1.5", "MACD_Signal": "1.2", "MACD_Hist": "0.3" }),
    )
}

pub fn sma() -> Value {
    series("Technical Analysis: SMA", json!({ "SMA": "181.00" }), json!({ "SMA": "182.50" }))
}

pub fn ema() -> Value {
    series("Technical Analysis: EMA", json!({ "EMA": "184.10" }), json!({ "EMA": "185.42" }))
}

pub fn bbands() -> Value {
    series(
        "Technical Analysis: BBANDS",
        json!({ "Real_Upper_Band": "189.0", "Real_Middle_Band": "184.0", "Real_Lower_Band": "179.0" }),
        json!({ "Real_Upper_Band": "190.1", "Real_Middle_Band": "185.0", "Real_Lower_Band": "179.9" }),
    )
}

pub fn stoch() -> Value {
    series(
        "Technical Analysis: STOCH",
        json!({ "SlowK": "70.0", "SlowD": "68.0" }),
        json!({ "SlowK": "80.2", "SlowD": "75.9" }),
    )
}

pub fn obv() -> Value {
    series("Technical Analysis: OBV", json!({ "OBV": "1200000" }), json!({ "OBV": "1234567" }))
}

/// Transport answering every indicator function with well-formed data.
pub fn with_indicators(transport: ScriptedTransport) -> ScriptedTransport {
    transport
        .json("RSI", rsi())
        .json("MACD", macd())
        .json("SMA", sma())
        .json("EMA", ema())
        .json("BBANDS", bbands())
        .json("STOCH", stoch())
        .json("OBV", obv())
}

/// Transport answering all eight stock requests with well-formed data.
pub fn healthy_stock_transport() -> ScriptedTransport {
    with_indicators(ScriptedTransport::new().json("GLOBAL_QUOTE", global_quote("150.0000")))
}

/// Transport answering all eight crypto requests with well-formed data.
pub fn healthy_crypto_transport() -> ScriptedTransport {
    with_indicators(
        ScriptedTransport::new().json("CURRENCY_EXCHANGE_RATE", exchange_rate("43250.12345678")),
    )
}

/// Raw `bestMatches` entry.
pub fn search_match(symbol: &str, name: &str, asset_type: &str, region: &str) -> Value {
    json!({
        "1. symbol": symbol,
        "2. name": name,
        "3. type": asset_type,
        "4. region": region,
        "8. currency": "USD",
        "9. matchScore": "1.0000"
    })
}

pub fn search_body(matches: Vec<Value>) -> Value {
    json!({ "bestMatches": matches })
}
