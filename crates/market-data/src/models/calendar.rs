use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One economic-calendar event, normalized across calendar feeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Source-namespaced identifier, stable for the same title/time/country
    pub event_id: String,
    pub title: String,
    pub country: Option<String>,
    pub datetime: DateTime<Utc>,
    pub importance: Option<String>,
    pub forecast: Option<String>,
    pub previous: Option<String>,
    pub actual: Option<String>,
    pub source: String,
}

/// Builds a deterministic event id from the fields that identify an event.
///
/// Used by feeds that do not carry their own ids, so the same event fetched
/// twice dedupes to the same key.
pub fn derive_event_id(
    prefix: &str,
    title: &str,
    datetime: &DateTime<Utc>,
    country: Option<&str>,
) -> String {
    let digest = md5::compute(format!(
        "{}|{}|{}",
        title,
        datetime.to_rfc3339(),
        country.unwrap_or("")
    ));
    let hex = format!("{:x}", digest);
    format!("{}-{}", prefix, &hex[..12])
}
