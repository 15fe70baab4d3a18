use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wallboard_market_data::{CalendarEvent, QuoteMap, ShortTermBoards};

use super::views::{build_heatmap, summarize};
use crate::settings::DataMode;

/// Calendar block of the snapshot (`{"events": [...]}`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarSection {
    pub events: Vec<CalendarEvent>,
}

/// Advance/decline counts over A-share index codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub total_indices: usize,
    pub advancing: usize,
    pub declining: usize,
    pub unchanged: usize,
}

/// One heatmap tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEntry {
    pub code: String,
    pub name: String,
    pub pct_change: Decimal,
}

/// Per-class data a snapshot is assembled from.
#[derive(Clone, Debug)]
pub struct ClassPayloads {
    pub indices: QuoteMap,
    pub fx: QuoteMap,
    pub rates: QuoteMap,
    pub commodities: QuoteMap,
    pub us_stocks: QuoteMap,
    pub crypto: QuoteMap,
    pub calendar: CalendarSection,
    pub a_share_short_term: ShortTermBoards,
}

/// One complete wallboard cycle.
///
/// Built fresh every cycle and never mutated afterwards; the derived views
/// are computed from `indices` at assembly time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub data_mode: DataMode,
    pub indices: QuoteMap,
    pub fx: QuoteMap,
    pub rates: QuoteMap,
    pub commodities: QuoteMap,
    pub us_stocks: QuoteMap,
    pub crypto: QuoteMap,
    pub calendar: CalendarSection,
    pub summary: MarketSummary,
    pub heatmap: Vec<HeatmapEntry>,
    pub a_share_heatmap: Vec<HeatmapEntry>,
    pub a_share_short_term: ShortTermBoards,
}

impl Snapshot {
    pub fn assemble(timestamp: DateTime<Utc>, data_mode: DataMode, parts: ClassPayloads) -> Self {
        let summary = summarize(&parts.indices);
        let heatmap = build_heatmap(&parts.indices, |_| true);
        let a_share_heatmap = build_heatmap(&parts.indices, |quote| quote.is_a_share());

        Self {
            timestamp,
            data_mode,
            indices: parts.indices,
            fx: parts.fx,
            rates: parts.rates,
            commodities: parts.commodities,
            us_stocks: parts.us_stocks,
            crypto: parts.crypto,
            calendar: parts.calendar,
            summary,
            heatmap,
            a_share_heatmap,
            a_share_short_term: parts.a_share_short_term,
        }
    }
}
