//! Wallboard Market Data Crate
//!
//! This crate turns many unreliable upstream market feeds into canonical,
//! per-asset-class quote mappings for the wallboard snapshot.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Indices, FX, rates, commodities, US stocks, crypto
//! - Economic calendar events with a fallback chain across feeds
//! - A-share sector board rankings
//! - Per-source caching, retry with backoff and rate-limit cooldowns
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     Provider     |  (Deterministic, Aggregated, Terminal, Null)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  Source fetchers | --> |   SourceClient   |  (retry, cooldown, proxy)
//! +------------------+     +------------------+
//!          |                        |
//!          v                        v
//! +------------------+     +------------------+
//! |    Normalizer    |     |  HttpTransport   |  (reqwest, scripted in tests)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | merge_by_recency |  -> QuoteMap per asset class
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Canonical quote record
//! - [`QuoteMap`] - Code-ordered quotes for one asset class
//! - [`CalendarEvent`] - Economic calendar entry
//! - [`ShortTermBoards`] - Hot, cold and capital-flow board rankings
//! - [`MarketDataProvider`] - Capability set consumed by the orchestrator

pub mod calendar;
pub mod errors;
pub mod fetch;
pub mod models;
pub mod normalizer;
pub mod provider;
pub mod sources;
pub mod transport;

pub use models::{
    AssetClass, BoardEntry, CalendarEvent, Quote, QuoteMap, ShortTermBoards, PCT_PRECISION,
};

pub use provider::{
    merge_by_recency, AggregatedProvider, DeterministicProvider, MarketDataProvider, NullProvider,
    TerminalProvider, TerminalSession,
};

pub use transport::{HttpTransport, ReqwestTransport};

pub use errors::{MarketDataError, RetryClass};
