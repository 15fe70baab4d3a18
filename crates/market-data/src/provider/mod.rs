//! Market data providers.
//!
//! This module contains:
//! - The `MarketDataProvider` trait the snapshot orchestrator consumes
//! - [`DeterministicProvider`]: fixed dataset, also the last fallback of the others
//! - [`AggregatedProvider`]: open upstream feeds with per-class fallback chains
//! - [`TerminalProvider`]: proprietary terminal behind a [`TerminalSession`]
//! - [`NullProvider`]: empty containers everywhere
//! - [`merge_by_recency`]: conflict resolution between overlapping sources
//!
//! # Fallback order
//!
//! Every provider is total. Live data is preferred, secondary sources fill
//! what is missing, and the deterministic dataset covers an outage.

mod aggregated;
mod deterministic;
mod merge;
mod null;
pub mod terminal;
mod traits;

pub use aggregated::AggregatedProvider;
pub use deterministic::DeterministicProvider;
pub use merge::merge_by_recency;
pub use null::NullProvider;
pub use terminal::{ConnectionState, TerminalProvider, TerminalSession, UnavailableTerminal};
pub use traits::MarketDataProvider;
