use chrono::{DateTime, Duration, Utc};

use crate::models::CalendarEvent;

/// How far back an already-started event stays visible.
pub const GRACE_MINUTES: i64 = 60;

/// How far ahead events are shown.
pub const LOOKAHEAD_DAYS: i64 = 10;

/// Events with `datetime` in `[now - 1h, now + 10d]`, in input order.
pub fn filter_window(events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<CalendarEvent> {
    let start = now - Duration::minutes(GRACE_MINUTES);
    let end = now + Duration::days(LOOKAHEAD_DAYS);
    events
        .iter()
        .filter(|event| event.datetime >= start && event.datetime <= end)
        .cloned()
        .collect()
}
