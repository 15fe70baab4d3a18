//! FXStreet economic calendar, read as a markdown table through the reader
//! proxy.
//!
//! Day headers are single-cell rows (`| Friday, March 07 |`); event rows are
//! `| time | ... | currency | title | ... | actual | ... | consensus | previous |`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use super::{CalendarFeed, DEFAULT_TITLE};
use crate::fetch::SourceClient;
use crate::models::{derive_event_id, CalendarEvent};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "FXStreet";

const ENDPOINT: &str = "https://www.fxstreet.com/economic-calendar";

/// Events kept per fetch.
pub const MAX_EVENTS: usize = 15;

fn parse_datetime(date_label: &str, time: &str, year: i32) -> Option<DateTime<Utc>> {
    let date =
        NaiveDate::parse_from_str(&format!("{} {}", date_label.trim(), year), "%A, %B %d %Y").ok()?;
    let time = time.trim();
    if time.is_empty() {
        return None;
    }
    let time = if time.eq_ignore_ascii_case("all day") {
        NaiveTime::MIN
    } else {
        NaiveTime::parse_from_str(&time.to_uppercase(), "%I:%M %p").ok()?
    };
    Some(date.and_time(time).and_utc())
}

fn value_cell(cells: &[&str], idx: usize, blanks: &[&str]) -> Option<String> {
    cells
        .get(idx)
        .copied()
        .filter(|cell| !blanks.contains(cell))
        .map(|cell| cell.to_string())
}

/// Parses the markdown table, keeping at most [`MAX_EVENTS`] events.
pub fn parse_table(text: &str, year: i32) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current_date: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if !line.starts_with('|') {
            continue;
        }
        let cells: Vec<&str> = line.trim_matches('|').split('|').map(str::trim).collect();
        if cells.len() == 1 && cells[0].contains(',') {
            current_date = Some(cells[0].to_string());
            continue;
        }
        let Some(date_label) = current_date.as_deref() else {
            continue;
        };
        if cells.len() < 4 {
            continue;
        }
        let starts_with_time = cells[0].starts_with(|c: char| c.is_ascii_digit())
            || cells[0].eq_ignore_ascii_case("all day");
        if !starts_with_time {
            continue;
        }
        let Some(datetime) = parse_datetime(date_label, cells[0], year) else {
            continue;
        };

        let currency = if cells[2].is_empty() { "--" } else { cells[2] };
        let title = if cells[3].is_empty() { DEFAULT_TITLE } else { cells[3] };
        events.push(CalendarEvent {
            event_id: derive_event_id("FXS", title, &datetime, Some(currency)),
            title: title.to_string(),
            country: Some(currency.to_string()),
            datetime,
            importance: None,
            actual: value_cell(&cells, 5, &["-", "", "locked"]),
            forecast: value_cell(&cells, 7, &["-", ""]),
            previous: value_cell(&cells, 8, &["-", ""]),
            source: SOURCE_ID.to_string(),
        });
        if events.len() >= MAX_EVENTS {
            break;
        }
    }
    events
}

pub struct FxStreetFeed {
    client: SourceClient,
}

impl FxStreetFeed {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new("FXSTREET", transport),
        }
    }
}

#[async_trait]
impl CalendarFeed for FxStreetFeed {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        match self
            .client
            .get_text_or_proxy(&HttpRequest::get(ENDPOINT))
            .await
        {
            Some(text) => parse_table(&text, now.year()),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    const TABLE: &str = "\
Title: Economic Calendar

| Friday, March 07 |
| --- |
| 01:30 PM | | USD | Nonfarm Payrolls (Feb) | 3 | 151K | | 160K | 143K |
| 01:30 PM | | USD | Unemployment Rate (Feb) | 3 | locked | | 4% | - |
| All Day | | JPY | Bank Holiday | | | | | |
| Tentative | | EUR | ECB Speech | | | | | |
";

    #[test]
    fn test_parse_table_rows() {
        let events = parse_table(TABLE, 2025);
        assert_eq!(events.len(), 3);

        let nfp = &events[0];
        assert_eq!(nfp.datetime, Utc.with_ymd_and_hms(2025, 3, 7, 13, 30, 0).unwrap());
        assert_eq!(nfp.country.as_deref(), Some("USD"));
        assert_eq!(nfp.actual.as_deref(), Some("151K"));
        assert_eq!(nfp.forecast.as_deref(), Some("160K"));
        assert_eq!(nfp.previous.as_deref(), Some("143K"));

        let unemployment = &events[1];
        assert!(unemployment.actual.is_none());
        assert!(unemployment.previous.is_none());

        assert_eq!(events[2].datetime.hour(), 0);
    }

    #[test]
    fn test_rows_before_a_date_header_are_ignored() {
        let text = "| 01:30 PM | | USD | CPI | 3 | | | | |";
        assert!(parse_table(text, 2025).is_empty());
    }

    #[test]
    fn test_caps_event_count() {
        let mut text = String::from("| Friday, March 07 |\n");
        for minute in 0..30 {
            text.push_str(&format!("| 01:{:02} PM | | USD | Event {} | | | | | |\n", minute, minute));
        }
        assert_eq!(parse_table(&text, 2025).len(), MAX_EVENTS);
    }
}
