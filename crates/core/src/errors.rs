//! Core error types for the wallboard.
//!
//! Provider failures never reach this layer: the market-data crate turns
//! them into partial or fallback data. What remains are configuration and
//! snapshot-cache failures.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Failed to (de)serialize cached payload: {0}")]
    CachePayload(#[from] serde_json::Error),
}
