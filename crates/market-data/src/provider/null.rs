use async_trait::async_trait;

use super::MarketDataProvider;
use crate::models::{CalendarEvent, QuoteMap, ShortTermBoards};

pub const PROVIDER_ID: &str = "NULL";

/// Provider that has nothing; every call returns an empty container.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

#[async_trait]
impl MarketDataProvider for NullProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_indices(&self) -> QuoteMap {
        QuoteMap::new()
    }

    async fn fetch_fx(&self) -> QuoteMap {
        QuoteMap::new()
    }

    async fn fetch_rates(&self) -> QuoteMap {
        QuoteMap::new()
    }

    async fn fetch_commodities(&self) -> QuoteMap {
        QuoteMap::new()
    }

    async fn fetch_us_stocks(&self) -> QuoteMap {
        QuoteMap::new()
    }

    async fn fetch_crypto(&self) -> QuoteMap {
        QuoteMap::new()
    }

    async fn fetch_calendar(&self) -> Vec<CalendarEvent> {
        Vec::new()
    }

    async fn fetch_a_share_short_term(&self) -> ShortTermBoards {
        ShortTermBoards::empty("null")
    }
}
