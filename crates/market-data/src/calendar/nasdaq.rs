//! Nasdaq economic events, one request per day for the next week.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use futures::future::join_all;
use serde_json::Value;

use super::{clean_text, CalendarFeed, DEFAULT_TITLE};
use crate::fetch::SourceClient;
use crate::models::{derive_event_id, CalendarEvent};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "Nasdaq";

const ENDPOINT: &str = "https://api.nasdaq.com/api/calendar/economicevents";
const LOOKAHEAD_DAYS: i64 = 7;

/// `gmt` is `HH:MM`, `24H` (all day) or blank; anything but a valid time
/// means midnight UTC.
fn event_time(date: NaiveDate, gmt: Option<&str>) -> DateTime<Utc> {
    let time = gmt
        .map(str::trim)
        .filter(|t| !t.eq_ignore_ascii_case("24H"))
        .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
        .unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

/// Parses one `data.rows[]` entry for the given day.
pub fn parse_row(date: NaiveDate, row: &Value) -> Option<CalendarEvent> {
    let row = row.as_object()?;
    let field = |keys: &[&str]| keys.iter().find_map(|k| row.get(*k).and_then(clean_text));

    let datetime = event_time(date, row.get("gmt").and_then(Value::as_str));
    let title = field(&["eventName", "event"]).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let country = field(&["country", "countryCode"]);

    Some(CalendarEvent {
        event_id: derive_event_id("NAS", &title, &datetime, country.as_deref()),
        title,
        country,
        datetime,
        importance: field(&["impact", "importance"]),
        forecast: field(&["consensus"]),
        previous: field(&["previous"]),
        actual: field(&["actual"]),
        source: SOURCE_ID.to_string(),
    })
}

pub struct NasdaqFeed {
    client: SourceClient,
}

impl NasdaqFeed {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new("NASDAQ", transport),
        }
    }

    async fn fetch_day(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        let request = HttpRequest::get(ENDPOINT)
            .query("date", date.format("%Y-%m-%d"))
            .header("Accept", "application/json");
        let Some(payload) = self.client.get_json(&request).await else {
            return Vec::new();
        };
        payload
            .pointer("/data/rows")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().filter_map(|row| parse_row(date, row)).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CalendarFeed for NasdaqFeed {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let today = now.date_naive();
        let days = (0..LOOKAHEAD_DAYS).map(|offset| today + Duration::days(offset));
        join_all(days.map(|day| self.fetch_day(day)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}
