//! Views derived from the indices map: market summary and heatmaps.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use wallboard_market_data::models::is_a_share_code;
use wallboard_market_data::{Quote, QuoteMap};

use super::snapshot_model::{HeatmapEntry, MarketSummary};

/// Heatmap grid size.
pub const HEATMAP_SIZE: usize = 16;

/// Counts A-share indices by the sign of their `change_pct`.
pub fn summarize(indices: &QuoteMap) -> MarketSummary {
    indices
        .iter()
        .filter(|(code, _)| is_a_share_code(code))
        .fold(MarketSummary::default(), |mut summary, (_, quote)| {
            summary.total_indices += 1;
            match quote.change_pct.cmp(&Decimal::ZERO) {
                Ordering::Greater => summary.advancing += 1,
                Ordering::Less => summary.declining += 1,
                Ordering::Equal => summary.unchanged += 1,
            }
            summary
        })
}

/// Tiles for the quotes accepted by `include`, biggest movers first.
///
/// Sorted by `|pct_change|` descending, ties broken by code, truncated to
/// [`HEATMAP_SIZE`].
pub fn build_heatmap<F>(indices: &QuoteMap, include: F) -> Vec<HeatmapEntry>
where
    F: Fn(&Quote) -> bool,
{
    let mut tiles: Vec<HeatmapEntry> = indices
        .iter()
        .filter(|(_, quote)| include(*quote))
        .map(|(code, quote)| HeatmapEntry {
            code: code.clone(),
            name: tile_name(code, quote),
            pct_change: quote.change_pct,
        })
        .collect();

    tiles.sort_by(|a, b| {
        b.pct_change
            .abs()
            .cmp(&a.pct_change.abs())
            .then_with(|| a.code.cmp(&b.code))
    });
    tiles.truncate(HEATMAP_SIZE);
    tiles
}

fn tile_name(code: &str, quote: &Quote) -> String {
    [quote.display_name.as_str(), quote.name.as_str()]
        .into_iter()
        .find(|name| !name.trim().is_empty())
        .unwrap_or(code)
        .to_string()
}
