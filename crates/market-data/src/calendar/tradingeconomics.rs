//! TradingEconomics calendar with the public guest credentials.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use super::{clean_text, CalendarFeed, DEFAULT_TITLE};
use crate::fetch::SourceClient;
use crate::models::{derive_event_id, CalendarEvent};
use crate::normalizer::try_parse_timestamp;
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "TradingEconomics";

const ENDPOINT: &str = "https://api.tradingeconomics.com/calendar";
const CREDENTIALS: &str = "guest:guest";
const LOOKAHEAD_DAYS: i64 = 7;
const MAX_EVENTS: usize = 100;

fn importance_label(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::Number(n) => match n.as_i64()? {
            1 => Some("Low".to_string()),
            2 => Some("Medium".to_string()),
            3 => Some("High".to_string()),
            other => Some(other.to_string()),
        },
        other => clean_text(other),
    }
}

pub fn parse_event(raw: &Value) -> Option<CalendarEvent> {
    let text = |keys: &[&str]| keys.iter().find_map(|k| raw.get(*k).and_then(clean_text));
    let datetime = try_parse_timestamp(raw.get("Date")?.as_str()?, chrono_tz::UTC)?;
    let title = text(&["Event", "Category"]).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let country = text(&["Country"]);
    let event_id = text(&["CalendarId", "Ticker"])
        .map(|id| format!("TE-{}", id))
        .unwrap_or_else(|| derive_event_id("TE", &title, &datetime, country.as_deref()));

    Some(CalendarEvent {
        event_id,
        title,
        country,
        datetime,
        importance: importance_label(raw.get("Importance")),
        forecast: text(&["Forecast", "TEForecast"]),
        previous: text(&["Previous"]),
        actual: text(&["Actual"]),
        source: SOURCE_ID.to_string(),
    })
}

pub struct TradingEconomicsFeed {
    client: SourceClient,
}

impl TradingEconomicsFeed {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new("TRADINGECONOMICS", transport),
        }
    }
}

#[async_trait]
impl CalendarFeed for TradingEconomicsFeed {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let start = now.date_naive();
        let end = start + Duration::days(LOOKAHEAD_DAYS);
        let request = HttpRequest::get(ENDPOINT)
            .query("c", CREDENTIALS)
            .query("format", "json")
            .query("d1", start.format("%Y-%m-%d"))
            .query("d2", end.format("%Y-%m-%d"));

        let Some(payload) = self.client.get_json(&request).await else {
            return Vec::new();
        };
        payload
            .as_array()
            .map(|events| {
                events
                    .iter()
                    .take(MAX_EVENTS)
                    .filter_map(parse_event)
                    .collect()
            })
            .unwrap_or_default()
    }
}
