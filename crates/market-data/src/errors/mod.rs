//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all upstream operations
//! - [`RetryClass`]: Classification for determining retry behavior
//!
//! None of these errors cross the provider boundary: fetchers translate them
//! into partial or empty mappings and log them.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while talking to an upstream source.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines how the
/// source client handles the error.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The source rate limited the request (HTTP 429).
    #[error("Rate limited: {source_id}")]
    RateLimited {
        /// The source that rate limited the request
        source_id: String,
    },

    /// The source is in its cooldown window; no request was issued.
    #[error("Cooling down: {source_id}")]
    CoolingDown {
        /// The source that is cooling down
        source_id: String,
    },

    /// The request to the source timed out.
    #[error("Timeout: {source_id}")]
    Timeout {
        /// The source that timed out
        source_id: String,
    },

    /// The source answered with a non-success HTTP status.
    #[error("HTTP {status} from {source_id}")]
    HttpStatus {
        /// The source that answered
        source_id: String,
        /// The HTTP status code
        status: u16,
    },

    /// A transport-level failure (connection refused, reset, DNS, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The payload could not be decoded at all.
    #[error("Malformed payload from {source_id}: {message}")]
    MalformedPayload {
        /// The source that sent the payload
        source_id: String,
        /// What was wrong with it
        message: String,
    },

    /// The proprietary terminal could not be reached or refused the query.
    #[error("Terminal unavailable: {0}")]
    TerminalUnavailable(String),

    /// The source answered but had nothing for the request.
    #[error("No data")]
    NoData,
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use wallboard_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { source_id: "FOREXFACTORY".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Cooldown);
    ///
    /// let error = MarketDataError::Timeout { source_id: "TENCENT".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } => RetryClass::Cooldown,

            Self::Timeout { .. } | Self::Network(_) => RetryClass::WithBackoff,

            // Server-side trouble is worth another attempt, client errors are not
            Self::HttpStatus { status, .. } if *status >= 500 || *status == 408 => {
                RetryClass::WithBackoff
            }

            Self::HttpStatus { .. }
            | Self::CoolingDown { .. }
            | Self::MalformedPayload { .. }
            | Self::TerminalUnavailable(_)
            | Self::NoData => RetryClass::Never,
        }
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let source_id = err
                .url()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string());
            return Self::Timeout { source_id };
        }
        Self::Network(err.to_string())
    }
}
