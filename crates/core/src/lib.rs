//! Wallboard Core - snapshot orchestration over the market-data providers.
//!
//! This crate turns a `MarketDataProvider` into complete wallboard snapshots:
//! it owns the runtime settings, the snapshot-level cache, the derived
//! summary and heatmap views, and the background refresh loop.

pub mod cache;
pub mod errors;
pub mod settings;
pub mod snapshot;

pub use settings::{DataMode, Settings};
pub use snapshot::{SharedSnapshotService, Snapshot, SnapshotService};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
