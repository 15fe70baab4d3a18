//! Tencent quote payloads (`qt.gtimg.cn`).
//!
//! The endpoint answers with one `v_<symbol>="...";` line per symbol. Equity
//! and index values are `~`-delimited token lists, futures (`hf_*`) values
//! are comma-separated.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use chrono_tz::Tz;

use super::parse::{localize, parse_decimal, try_parse_timestamp};
use super::raw::RawQuote;

const TOKEN_LAST: usize = 3;
const TOKEN_PREV_CLOSE: usize = 4;
const TOKEN_OPEN: usize = 5;
const TOKEN_TIMESTAMP: usize = 30;
const TOKEN_CHANGE: usize = 31;
const TOKEN_CHANGE_PCT: usize = 32;
const TOKEN_HIGH: usize = 33;
const TOKEN_LOW: usize = 34;
const MIN_TOKENS: usize = 5;

const FUTURES_MIN_PARTS: usize = 13;
const FUTURES_TIME: usize = 6;
const FUTURES_DATE: usize = 12;

/// Splits a response body into `symbol -> raw value`.
pub fn parse_envelope(text: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in text.trim().split(';') {
        let line = line.trim();
        let Some((prefix, rest)) = line.split_once('=') else {
            continue;
        };
        let symbol = prefix.rsplit("v_").next().unwrap_or(prefix).trim();
        let value = rest.trim().trim_matches(';').trim_matches('"');
        if !symbol.is_empty() && !value.is_empty() {
            entries.insert(symbol.to_string(), value.to_string());
        }
    }
    entries
}

/// Exchange timezone for a Tencent symbol, from its market prefix.
pub fn symbol_timezone(symbol: &str) -> Tz {
    if symbol.starts_with("us") {
        chrono_tz::America::New_York
    } else if symbol.starts_with("hk") {
        chrono_tz::Asia::Hong_Kong
    } else {
        chrono_tz::Asia::Shanghai
    }
}

/// Parses a `~`-delimited equity/index value.
pub fn parse_tokens(raw: &str, tz: Tz) -> Option<RawQuote> {
    let tokens: Vec<&str> = raw.split('~').collect();
    if tokens.len() < MIN_TOKENS {
        return None;
    }
    let field = |idx: usize| tokens.get(idx).and_then(|t| parse_decimal(t));

    Some(RawQuote {
        last: field(TOKEN_LAST),
        prev_close: field(TOKEN_PREV_CLOSE),
        open: field(TOKEN_OPEN),
        change: field(TOKEN_CHANGE),
        change_pct: field(TOKEN_CHANGE_PCT),
        high: field(TOKEN_HIGH),
        low: field(TOKEN_LOW),
        volume: None,
        timestamp: tokens
            .get(TOKEN_TIMESTAMP)
            .and_then(|t| try_parse_timestamp(t, tz)),
    })
}

/// Parses a comma-separated futures value:
/// `last, change, prev_close, open, high, low, time, ..., date@12`.
pub fn parse_futures(raw: &str, tz: Tz) -> Option<RawQuote> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() < FUTURES_MIN_PARTS {
        return None;
    }
    let field = |idx: usize| parts.get(idx).and_then(|p| parse_decimal(p));

    let stamp = format!(
        "{} {}",
        parts[FUTURES_DATE].trim(),
        parts[FUTURES_TIME].trim()
    );
    let timestamp = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S")
        .ok()
        .and_then(|naive| localize(naive, tz));

    Some(RawQuote {
        last: field(0),
        change: field(1),
        prev_close: field(2),
        open: field(3),
        high: field(4),
        low: field(5),
        change_pct: None,
        volume: None,
        timestamp,
    })
}
