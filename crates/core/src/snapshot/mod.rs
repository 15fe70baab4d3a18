//! Snapshot orchestration.
//!
//! ```text
//! scheduler ─┐
//!            ├─> SharedSnapshotService ─> SnapshotService ──> MarketDataProvider
//! API ───────┘                                │
//!                                             └──> SnapshotCache (optional)
//! ```
//!
//! - **Model** (`snapshot_model.rs`) - Snapshot, summary and heatmap types
//! - **Views** (`views.rs`) - Summary and heatmap derivation
//! - **Service** (`snapshot_service.rs`) - Per-class cache-or-fetch and assembly
//! - **Shared** (`shared.rs`) - Swappable handle to the active service
//! - **Scheduler** (`scheduler.rs`) - Periodic background refresh
//! - **Provider factory** (`provider_factory.rs`) - Data mode to provider

mod provider_factory;
mod scheduler;
mod shared;
mod snapshot_model;
mod snapshot_service;
pub mod views;


pub use provider_factory::{build_provider, build_snapshot_service};
pub use scheduler::start_refresh_scheduler;
pub use shared::SharedSnapshotService;
pub use snapshot_model::{CalendarSection, ClassPayloads, HeatmapEntry, MarketSummary, Snapshot};
pub use snapshot_service::{ClassPayload, SnapshotService};
