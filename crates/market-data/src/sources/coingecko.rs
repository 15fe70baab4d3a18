//! CoinGecko simple-price quotes for the tracked coins.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use log::info;
use rust_decimal::Decimal;
use serde_json::Value;

use super::catalog::COINGECKO_COINS;
use crate::fetch::{SourceClient, TtlSlot};
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{decimal_from_json, normalize, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "COINGECKO";

const ENDPOINT: &str = "https://api.coingecko.com/api/v3/simple/price";
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Turns one coin entry (`{"usd": .., "usd_24h_change": ..}`) into a draft.
///
/// The previous price is backed out of the 24h percentage change.
fn coin_draft(entry: &Value) -> Option<RawQuote> {
    let last = entry.get("usd").and_then(decimal_from_json)?;
    let change_pct = entry
        .get("usd_24h_change")
        .and_then(decimal_from_json)
        .unwrap_or(Decimal::ZERO);
    let denominator = Decimal::ONE + change_pct / Decimal::ONE_HUNDRED;
    let prev_close = if denominator.is_zero() {
        last
    } else {
        last.checked_div(denominator).unwrap_or(last)
    };

    Some(RawQuote {
        last: Some(last),
        prev_close: Some(prev_close),
        change_pct: Some(change_pct),
        timestamp: entry
            .get("last_updated_at")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        ..Default::default()
    })
}

pub struct CoinGeckoSource {
    client: SourceClient,
    cache: TtlSlot<Value>,
}

impl CoinGeckoSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
            cache: TtlSlot::new(CACHE_TTL),
        }
    }

    async fn fetch_payload(&self) -> Option<Value> {
        if let Some(cached) = self.cache.get_fresh(&()) {
            return Some(cached);
        }
        let ids = COINGECKO_COINS
            .iter()
            .map(|c| c.symbol)
            .collect::<Vec<_>>()
            .join(",");
        let request = HttpRequest::get(ENDPOINT)
            .query("ids", ids)
            .query("vs_currencies", "usd")
            .query("include_24hr_change", "true")
            .query("include_last_updated_at", "true");
        let payload = self.client.get_json(&request).await.filter(Value::is_object)?;
        self.cache.insert((), payload.clone());
        Some(payload)
    }

    pub async fn fetch_quotes(&self) -> QuoteMap {
        let Some(payload) = self.fetch_payload().await else {
            return QuoteMap::new();
        };

        let quotes: QuoteMap = COINGECKO_COINS
            .iter()
            .filter_map(|coin| {
                let draft = coin_draft(payload.get(coin.symbol)?)?;
                let label = QuoteLabel::new(coin.code, coin.name, SOURCE_ID);
                normalize(draft, label, AssetClass::Crypto.precision()).map(|q| (q.code.clone(), q))
            })
            .collect();

        info!("{} returned {} coins", SOURCE_ID, quotes.len());
        quotes
    }
}
