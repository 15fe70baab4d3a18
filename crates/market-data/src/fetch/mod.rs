//! Fetch machinery shared by every upstream source.
//!
//! - [`RetryPolicy`] - attempt budget with linear backoff
//! - [`Cooldown`] - timed suspension after rate limiting
//! - [`TtlCache`] - per-source short-lived cache
//! - [`SourceClient`] - request loop combining the above

mod cache;
mod client;
mod cooldown;
mod retry_policy;

pub use cache::{TtlCache, TtlSlot};
pub use client::{extract_json, proxied, SourceClient, READER_PROXY};
pub use cooldown::Cooldown;
pub use retry_policy::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
