//! China government bond yields from the ChinaBond yield table.
//!
//! The page is only reachable through the reader proxy, which renders it as
//! plain text rows such as `2025-03-07 10Y 1.8234 -0.52` (yield in percent,
//! change in basis points).

use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use rust_decimal::Decimal;

use super::catalog::CHINABOND_TENORS;
use crate::fetch::{proxied, SourceClient, TtlSlot};
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{normalize, parse_decimal, try_parse_timestamp, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "CHINABOND";

const ENDPOINT: &str = "http://yield.chinabond.com.cn/cbweb-czb-web/czb/moreInfo";
const CACHE_TTL: Duration = Duration::from_secs(600);

lazy_static! {
    static ref DATE_PREFIX: Regex =
        Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+(.*)").expect("Invalid regex pattern");
    static ref MATURITY: Regex =
        Regex::new(r"(?i)^(\d{1,3}\s*(?:Y|YR|MO))\s+(.*)").expect("Invalid regex pattern");
    static ref NUMBER: Regex = Regex::new(r"-?\d+\.\d+").expect("Invalid regex pattern");
}

/// Parses the proxied yield table into quotes for the tracked tenors.
///
/// A leading date applies to the row it starts and every following row.
pub fn parse_table(text: &str) -> QuoteMap {
    let mut current_date: Option<String> = None;
    let mut quotes = QuoteMap::new();

    for raw_line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut line = raw_line;
        if let Some(caps) = DATE_PREFIX.captures(raw_line) {
            current_date = Some(caps[1].to_string());
            line = caps.get(2).map_or("", |m| m.as_str()).trim();
        }

        let Some(caps) = MATURITY.captures(line) else {
            continue;
        };
        let numbers: Vec<Decimal> = NUMBER
            .find_iter(&caps[2])
            .filter_map(|m| parse_decimal(m.as_str()))
            .collect();
        let Some(&last) = numbers.first() else {
            continue;
        };
        let change_bp = numbers.get(1).copied().unwrap_or(Decimal::ZERO);

        let maturity = caps[1]
            .to_uppercase()
            .replace(' ', "")
            .replace("YR", "Y")
            .replace("MO", "M");
        let Some(tenor) = CHINABOND_TENORS.iter().find(|t| t.symbol == maturity) else {
            continue;
        };

        let change = change_bp / Decimal::ONE_HUNDRED;
        let draft = RawQuote {
            last: Some(last),
            change: Some(change),
            timestamp: current_date
                .as_deref()
                .and_then(|d| try_parse_timestamp(d, chrono_tz::Asia::Shanghai)),
            ..Default::default()
        }
        .with_prev_close_from_change();
        let label = QuoteLabel::new(tenor.code, tenor.name, SOURCE_ID);
        if let Some(quote) = normalize(draft, label, AssetClass::Rates.precision()) {
            quotes.insert(quote.code.clone(), quote);
        }
    }
    quotes
}

pub struct ChinaBondSource {
    client: SourceClient,
    cache: TtlSlot<QuoteMap>,
}

impl ChinaBondSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
            cache: TtlSlot::new(CACHE_TTL),
        }
    }

    pub async fn fetch_quotes(&self) -> QuoteMap {
        if let Some(cached) = self.cache.get_fresh(&()) {
            return cached;
        }
        let request = HttpRequest::get(ENDPOINT)
            .query("locale", "en_US")
            .query("nameType", 1);
        let Some(text) = self.client.get_text(&proxied(&request)).await else {
            return QuoteMap::new();
        };

        let quotes = parse_table(&text);
        if !quotes.is_empty() {
            self.cache.insert((), quotes.clone());
        }
        info!("{} returned {} yields", SOURCE_ID, quotes.len());
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;

    const TABLE: &str = "Title: ChinaBond Yield\n\n\
        2025-03-07 1Y 1.4512 0.85\n\
        3 YR 1.5520 -1.20\n\
        5Y 1.6233\n\
        10Y 1.8234 -0.52\n\
        30Y 2.0412 0.10\n\
        6MO 1.3100 0.20\n";

    #[test]
    fn test_parse_table_tracks_tenors() {
        let quotes = parse_table(TABLE);
        assert_eq!(quotes.len(), 4);

        let ten_year = &quotes["M0000017.SH"];
        assert_eq!(ten_year.last, dec!(1.823));
        assert_eq!(ten_year.prev_close, dec!(1.829));
        assert_eq!(ten_year.timestamp.to_rfc3339(), "2025-03-06T16:00:00+00:00");

        let three_year = &quotes["M0000007.SH"];
        assert_eq!(three_year.change, dec!(-0.012));

        let five_year = &quotes["M0000025.SH"];
        assert_eq!(five_year.change, Decimal::ZERO);
    }

    #[test]
    fn test_parse_table_ignores_noise() {
        assert!(parse_table("").is_empty());
        assert!(parse_table("no table here\n| a | b |").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_goes_through_proxy_and_caches() {
        let transport = Arc::new(ScriptedTransport::new().ok("r.jina.ai", TABLE));
        let source = ChinaBondSource::new(transport.clone());

        assert_eq!(source.fetch_quotes().await.len(), 4);
        assert_eq!(source.fetch_quotes().await.len(), 4);
        assert_eq!(transport.total_calls(), 1);
        assert!(transport.requests()[0].url.starts_with("https://r.jina.ai/http://yield.chinabond.com.cn"));
    }
}
