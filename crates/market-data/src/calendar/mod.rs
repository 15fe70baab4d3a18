//! Economic calendar feeds and the fallback chain across them.
//!
//! Feeds are tried in order; the first one that yields at least one event
//! inside the display window wins. The winning list is kept as the
//! known-good list and short-circuits the chain until its TTL lapses, so it
//! also covers an outage for that long. Once it expires, a full outage
//! yields nothing.

pub mod forexfactory;
pub mod fxstreet;
pub mod nasdaq;
pub mod tradingeconomics;
mod window;

pub use forexfactory::ForexFactoryFeed;
pub use fxstreet::FxStreetFeed;
pub use nasdaq::NasdaqFeed;
pub use tradingeconomics::TradingEconomicsFeed;
pub use window::{filter_window, GRACE_MINUTES, LOOKAHEAD_DAYS};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;

use crate::fetch::TtlSlot;
use crate::models::CalendarEvent;
use crate::transport::HttpTransport;

/// Title used when a feed sends an event without one.
pub const DEFAULT_TITLE: &str = "事件";

/// How long the known-good list is served without asking the feeds.
pub const FRESH_FOR: Duration = Duration::from_secs(20 * 60);

/// Trimmed text from a string or number cell; blank and null are absent.
pub(crate) fn clean_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// One upstream calendar. Implementations never fail: an unusable response
/// is an empty list.
#[async_trait]
pub trait CalendarFeed: Send + Sync {
    fn id(&self) -> &'static str;

    async fn fetch(&self, now: DateTime<Utc>) -> Vec<CalendarEvent>;
}

pub struct CalendarWaterfall {
    feeds: Vec<Box<dyn CalendarFeed>>,
    cache: TtlSlot<Vec<CalendarEvent>>,
}

impl CalendarWaterfall {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_feeds(vec![
            Box::new(NasdaqFeed::new(transport.clone())),
            Box::new(FxStreetFeed::new(transport.clone())),
            Box::new(ForexFactoryFeed::new(transport.clone())),
            Box::new(TradingEconomicsFeed::new(transport)),
        ])
    }

    pub fn with_feeds(feeds: Vec<Box<dyn CalendarFeed>>) -> Self {
        Self {
            feeds,
            cache: TtlSlot::new(FRESH_FOR),
        }
    }

    #[cfg(test)]
    fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TtlSlot::new(ttl);
        self
    }

    /// In-window events from the known-good list while it is fresh, else
    /// from the first feed that has any.
    pub async fn fetch_events(&self) -> Vec<CalendarEvent> {
        let now = Utc::now();

        if let Some(known_good) = self.cache.get_fresh(&()) {
            let events = filter_window(&known_good, now);
            if !events.is_empty() {
                debug!("Calendar served from known-good list ({} events)", events.len());
                return events;
            }
        }

        for feed in &self.feeds {
            let events = filter_window(&feed.fetch(now).await, now);
            if events.is_empty() {
                debug!("Calendar feed {} had nothing in window", feed.id());
                continue;
            }
            info!("Calendar from {}: {} events", feed.id(), events.len());
            self.cache.insert((), events.clone());
            return events;
        }

        warn!("All calendar feeds failed and no fresh known-good list is available");
        Vec::new()
    }
}
