//! Upstream provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteTransport` trait every upstream call goes through
//! - `UpstreamQuery`, the value describing one request
//! - The Alpha Vantage HTTP client and its envelope checks
//!
//! # Architecture
//!
//! The transport is deliberately thin: it builds the URL, applies the
//! per-request timeout and decodes JSON. Envelope inspection, retries and
//! reconciliation happen in the resolver and aggregator, so a fake transport
//! exercises the same code paths as the real one.

mod traits;

pub mod alpha_vantage;

pub use alpha_vantage::AlphaVantageClient;
pub use traits::{QuoteTransport, UpstreamQuery};

/// Identifier of the upstream provider, used in errors and logs.
pub const PROVIDER_ID: &str = "ALPHA_VANTAGE";
