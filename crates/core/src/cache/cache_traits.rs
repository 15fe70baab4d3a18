use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// Byte-oriented cache with per-entry expiry.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Payload stored under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `payload` under `key` for `ttl`, replacing any previous entry.
    async fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()>;
}
