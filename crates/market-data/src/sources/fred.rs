//! FRED daily series (US Treasury yields and overnight rates) via the
//! public `fredgraph.csv` download.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use log::info;
use rust_decimal::Decimal;

use super::catalog::{Listing, FRED_RATES};
use crate::fetch::{SourceClient, TtlCache};
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{normalize, parse_decimal, try_parse_timestamp, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "FRED";

const ENDPOINT: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";
const CACHE_TTL: Duration = Duration::from_secs(300);
const LOOKBACK_DAYS: i64 = 40;

/// Latest and previous observations of a series.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub date: String,
    pub value: Decimal,
    pub previous: Option<Decimal>,
}

/// Parses a two-column `date,value` CSV; missing values (`.`) are skipped.
pub fn parse_series(text: &str) -> Option<Observation> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let samples: Vec<(String, Decimal)> = reader
        .records()
        .flatten()
        .filter_map(|row| {
            let value = parse_decimal(row.get(1)?)?;
            Some((row.get(0)?.to_string(), value))
        })
        .collect();

    let (date, value) = samples.last()?.clone();
    let previous = samples.len().checked_sub(2).map(|idx| samples[idx].1);
    Some(Observation {
        date,
        value,
        previous,
    })
}

pub struct FredSource {
    client: SourceClient,
    cache: TtlCache<&'static str, Observation>,
}

impl FredSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    async fn fetch_series(&self, series_id: &'static str) -> Option<Observation> {
        if let Some(cached) = self.cache.get_fresh(&series_id) {
            return Some(cached);
        }
        let start = (Utc::now() - chrono::Duration::days(LOOKBACK_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let request = HttpRequest::get(ENDPOINT)
            .query("id", series_id)
            .query("cosd", start);
        let text = self.client.get_text(&request).await?;
        let observation = parse_series(&text)?;
        self.cache.insert(series_id, observation.clone());
        Some(observation)
    }

    /// Rate quotes for every tracked series, downloaded concurrently.
    pub async fn fetch_quotes(&self) -> QuoteMap {
        self.fetch_listings(FRED_RATES).await
    }

    async fn fetch_listings(&self, listings: &[Listing]) -> QuoteMap {
        let observations = join_all(listings.iter().map(|l| self.fetch_series(l.symbol))).await;

        let quotes: QuoteMap = listings
            .iter()
            .zip(observations)
            .filter_map(|(listing, observation)| {
                let observation = observation?;
                let draft = RawQuote {
                    last: Some(observation.value),
                    prev_close: Some(observation.previous.unwrap_or(observation.value)),
                    timestamp: try_parse_timestamp(&observation.date, chrono_tz::UTC),
                    ..Default::default()
                };
                let label = QuoteLabel::new(listing.code, listing.name, SOURCE_ID);
                normalize(draft, label, AssetClass::Rates.precision()).map(|q| (q.code.clone(), q))
            })
            .collect();

        info!("{} returned {}/{} series", SOURCE_ID, quotes.len(), listings.len());
        quotes
    }
}
