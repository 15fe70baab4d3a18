//! Market data models
//!
//! This module contains the canonical data types produced by the pipeline:
//! - `types` - Asset classes, precision rules and the per-class quote mapping
//! - `quote` - The canonical quote record
//! - `calendar` - Economic calendar events
//! - `board` - A-share sector board rankings

mod board;
mod calendar;
mod quote;
mod types;

pub use board::{BoardEntry, ShortTermBoards};
pub use calendar::{derive_event_id, CalendarEvent};
pub use quote::{is_a_share_code, Quote};
pub use types::{AssetClass, QuoteMap, SourceId, PCT_PRECISION};
