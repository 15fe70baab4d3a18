//! Stooq light-quote CSV rows: `symbol,date,time,open,high,low,close,volume`.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use chrono_tz::Tz;

use super::parse::{localize, parse_decimal};
use super::raw::RawQuote;

const MIN_COLUMNS: usize = 8;

/// Stooq publishes in Central European time.
pub const STOOQ_TZ: Tz = chrono_tz::Europe::Warsaw;

/// Parses a CSV body into `UPPERCASE_SYMBOL -> draft`.
///
/// Rows carrying an `N/D` marker in any value column are dropped. Stooq's
/// light quote has no previous close, so the session open serves as the
/// reference price (falling back to `close`).
pub fn parse_csv(text: &str) -> HashMap<String, RawQuote> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim().as_bytes());

    let mut quotes = HashMap::new();
    for record in reader.records().flatten() {
        if record.len() < MIN_COLUMNS {
            continue;
        }
        if record.iter().skip(1).any(|cell| cell == "N/D") {
            continue;
        }
        let field = |idx: usize| record.get(idx).and_then(parse_decimal);
        let Some(last) = field(6) else {
            continue;
        };
        let open = field(3);

        quotes.insert(
            record[0].to_uppercase(),
            RawQuote {
                last: Some(last),
                prev_close: Some(open.unwrap_or(last)),
                open: Some(open.unwrap_or(last)),
                high: field(4),
                low: field(5),
                volume: field(7),
                change: None,
                change_pct: None,
                timestamp: row_timestamp(&record[1], &record[2]),
            },
        );
    }
    quotes
}

fn row_timestamp(date: &str, time: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if date.len() != 8 {
        return None;
    }
    let time = if time.is_empty() { "000000" } else { time };
    NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S")
        .ok()
        .and_then(|naive| localize(naive, STOOQ_TZ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parses_rows_and_drops_missing() {
        let body = "^SPX,20250307,220000,5200.1,5240.0,5190.5,5235.4,0\n\
                    ^N225,N/D,N/D,N/D,N/D,N/D,N/D,N/D\n\
                    aapl.us,20250307,220000,187,189.5,186.2,188.2,51234567\n";
        let quotes = parse_csv(body);
        assert_eq!(quotes.len(), 2);

        let spx = &quotes["^SPX"];
        assert_eq!(spx.last, Some(dec!(5235.4)));
        assert_eq!(spx.prev_close, Some(dec!(5200.1)));
        assert_eq!(spx.timestamp.unwrap().hour(), 21);

        let aapl = &quotes["AAPL.US"];
        assert_eq!(aapl.volume, Some(dec!(51234567)));
        assert!(!quotes.contains_key("^N225"));
    }

    #[test]
    fn test_short_rows_and_header_are_skipped() {
        let body = "Symbol,Date,Time,Open,High,Low,Close,Volume\n^DJI,20250307\n";
        assert!(parse_csv(body).is_empty());
    }

    #[test]
    fn test_missing_open_uses_close_as_reference() {
        let body = "^DAX,20250307,173000,,18800,18700,18750.8,\n";
        let quote = &parse_csv(body)["^DAX"];
        assert_eq!(quote.prev_close, Some(dec!(18750.8)));
        assert!(quote.volume.is_none());
    }
}
