//! Total parsing helpers shared by every payload shape.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Placeholder strings upstreams use for "no value".
const MISSING_MARKERS: &[&str] = &["", "N/D", "-", "--", "None", "null", "NaN", "nan"];

/// Naive datetime layouts accepted for source-local timestamps.
const NAIVE_FORMATS: &[&str] = &[
    "%Y%m%d%H%M%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Parses a numeric string into a `Decimal`.
///
/// Never fails: blanks, placeholder markers and anything non-numeric yield
/// `None`. Scientific notation is accepted.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim().trim_matches('"');
    if MISSING_MARKERS.contains(&trimmed) {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(decimal_from_f64))
}

/// Converts a float, rejecting NaN and infinities.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

/// Reads a JSON number or numeric string as a `Decimal`.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_f64().and_then(decimal_from_f64),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parses a timestamp, interpreting naive values in the source timezone.
///
/// Accepts `YYYYMMDDHHMMSS`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 and bare
/// `YYYY-MM-DD` dates (midnight). Returns `None` when nothing matches.
pub fn try_parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(stripped) = trimmed.strip_suffix('Z') {
        if let Ok(naive) = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    localize(naive, tz)
}

/// Like [`try_parse_timestamp`] but falls back to the current time.
pub fn parse_timestamp(raw: Option<&str>, tz: Tz) -> DateTime<Utc> {
    raw.and_then(|value| try_parse_timestamp(value, tz))
        .unwrap_or_else(Utc::now)
}

/// Converts a naive source-local datetime into UTC.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
