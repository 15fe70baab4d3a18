//! The provider capability set the snapshot orchestrator consumes.

use async_trait::async_trait;

use crate::models::{CalendarEvent, QuoteMap, ShortTermBoards};

/// A source of one snapshot's worth of market data.
///
/// Every method is total: upstream failures turn into partial or fallback
/// data, never into an error. Implementations decide their own fallback
/// order.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use wallboard_market_data::provider::MarketDataProvider;
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_indices(&self) -> QuoteMap {
///         QuoteMap::new()
///     }
///
///     // ... one method per asset class
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Identifier used in logs (e.g. "MOCK", "OPEN", "TERMINAL").
    fn id(&self) -> &'static str;

    /// A-share and global equity indices.
    async fn fetch_indices(&self) -> QuoteMap;

    async fn fetch_fx(&self) -> QuoteMap;

    /// Government yields and policy/interbank rates.
    async fn fetch_rates(&self) -> QuoteMap;

    async fn fetch_commodities(&self) -> QuoteMap;

    async fn fetch_us_stocks(&self) -> QuoteMap;

    async fn fetch_crypto(&self) -> QuoteMap;

    /// Upcoming economic events, already restricted to the display window
    /// where the provider has live data.
    async fn fetch_calendar(&self) -> Vec<CalendarEvent>;

    /// Hot, cold and capital-flow board rankings.
    async fn fetch_a_share_short_term(&self) -> ShortTermBoards;
}
