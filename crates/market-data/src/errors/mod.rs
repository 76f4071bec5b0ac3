//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`TransportFailureKind`]: Why a transport call failed
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use std::fmt;

use thiserror::Error;

/// Why an upstream transport call failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportFailureKind {
    /// The request did not complete within its timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// Upstream answered with a non-success HTTP status.
    Status(u16),
    /// The response body could not be read or decoded.
    Decode,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connect"),
            Self::Status(status) => write!(f, "HTTP {}", status),
            Self::Decode => write!(f, "decode"),
        }
    }
}

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the transport retry loop resends a request.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Malformed caller input (empty keywords, symbol shape mismatch).
    /// Never retried.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the validation failure
        message: String,
    },

    /// Upstream signaled throttling.
    #[error("Rate limited by {provider}: {note}. Please retry later")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
        /// The upstream-provided note
        note: String,
    },

    /// Upstream returned a structured error unrelated to rate limiting.
    #[error("Upstream error: {provider} - {message}")]
    Upstream {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// Network, timeout or HTTP status failure while talking to upstream.
    #[error("Transport failure: {provider} ({kind}) - {message}")]
    Transport {
        /// The provider being called
        provider: String,
        /// Failure classification
        kind: TransportFailureKind,
        /// Underlying error text
        message: String,
    },

    /// No API key was configured.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Orchestration failed for a reason unrelated to a single upstream call.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

impl MarketDataError {
    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new rate limit error.
    pub fn rate_limited(provider: impl Into<String>, note: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            note: note.into(),
        }
    }

    /// Create a new upstream error.
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new transport error.
    pub fn transport(
        provider: impl Into<String>,
        kind: TransportFailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::WithBackoff`]: timeouts, connect failures and 5xx statuses
    /// - [`RetryClass::Never`]: everything else, including 4xx and envelope markers
    ///
    /// # Examples
    ///
    /// ```
    /// use tickerscope_market_data::errors::{MarketDataError, RetryClass, TransportFailureKind};
    ///
    /// let error = MarketDataError::transport("ALPHA_VANTAGE", TransportFailureKind::Timeout, "timed out");
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::validation("empty symbol");
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Transport { kind, .. } => match kind {
                TransportFailureKind::Timeout | TransportFailureKind::Connect => {
                    RetryClass::WithBackoff
                }
                TransportFailureKind::Status(status) if *status >= 500 => RetryClass::WithBackoff,
                TransportFailureKind::Status(_) | TransportFailureKind::Decode => RetryClass::Never,
            },

            Self::Validation { .. }
            | Self::RateLimited { .. }
            | Self::Upstream { .. }
            | Self::MissingApiKey(_)
            | Self::Internal { .. } => RetryClass::Never,
        }
    }

    /// Whether this error is a transport-level failure (network, timeout, HTTP status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
