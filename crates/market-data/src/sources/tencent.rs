//! Tencent quote feed: A-share and global indices, US stocks, futures.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use super::catalog::Listing;
use crate::fetch::{SourceClient, TtlCache};
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{normalize, tencent, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "TENCENT";

const ENDPOINT: &str = "http://qt.gtimg.cn/q=";
const CACHE_TTL: Duration = Duration::from_secs(5);

/// Maximum symbols per request.
pub const CHUNK_SIZE: usize = 15;

pub struct TencentSource {
    client: SourceClient,
    /// Raw values per upstream symbol
    cache: TtlCache<String, String>,
}

impl TencentSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_client(client: SourceClient) -> Self {
        Self {
            client,
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    /// Raw values for `symbols`; only stale or missing symbols are requested,
    /// in chunks of [`CHUNK_SIZE`].
    async fn fetch_raw(&self, symbols: &[String]) -> HashMap<String, String> {
        let (mut values, pending) = self.cache.partition(symbols);
        if !values.is_empty() {
            debug!("{} cache hit for {} symbols", SOURCE_ID, values.len());
        }

        for chunk in pending.chunks(CHUNK_SIZE) {
            let request = HttpRequest::get(format!("{}{}", ENDPOINT, chunk.join(",")));
            let Some(body) = self.client.get_text(&request).await else {
                continue;
            };
            for (symbol, value) in tencent::parse_envelope(&body) {
                self.cache.insert(symbol.clone(), value.clone());
                values.insert(symbol, value);
            }
        }
        values
    }

    /// Index and stock quotes for `listings`.
    pub async fn fetch_quotes(&self, listings: &[Listing], class: AssetClass) -> QuoteMap {
        self.fetch_with(listings, class, |raw, symbol| {
            tencent::parse_tokens(raw, tencent::symbol_timezone(symbol))
        })
        .await
    }

    /// Futures quotes (`hf_*` symbols) for `listings`.
    pub async fn fetch_futures(&self, listings: &[Listing]) -> QuoteMap {
        self.fetch_with(listings, AssetClass::Commodities, |raw, _| {
            tencent::parse_futures(raw, chrono_tz::Asia::Shanghai)
        })
        .await
    }

    async fn fetch_with<F>(&self, listings: &[Listing], class: AssetClass, parse: F) -> QuoteMap
    where
        F: Fn(&str, &str) -> Option<RawQuote>,
    {
        if listings.is_empty() {
            return QuoteMap::new();
        }
        let symbols: Vec<String> = listings.iter().map(|l| l.symbol.to_string()).collect();
        let raw_values = self.fetch_raw(&symbols).await;

        let quotes: QuoteMap = listings
            .iter()
            .filter_map(|listing| {
                let raw = raw_values.get(listing.symbol)?;
                let draft = parse(raw, listing.symbol)?;
                let label = QuoteLabel::new(listing.code, listing.name, SOURCE_ID);
                normalize(draft, label, class.precision()).map(|q| (q.code.clone(), q))
            })
            .collect();

        info!(
            "{} returned {}/{} {} quotes",
            SOURCE_ID,
            quotes.len(),
            listings.len(),
            class
        );
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RetryPolicy;
    use crate::sources::catalog::{TENCENT_A_SHARE_INDICES, TENCENT_FUTURES};
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;

    fn index_value(last: &str, prev: &str) -> String {
        let mut tokens = vec![""; 35];
        tokens[3] = last;
        tokens[4] = prev;
        tokens[30] = "20250307150001";
        tokens.join("~")
    }

    fn source(transport: Arc<ScriptedTransport>) -> TencentSource {
        TencentSource::with_client(
            SourceClient::new(SOURCE_ID, transport).with_retry(RetryPolicy::new(2, Duration::ZERO)),
        )
    }

    #[tokio::test]
    async fn test_chunks_twenty_symbols_into_two_requests() {
        let transport = Arc::new(ScriptedTransport::new().ok("qt.gtimg.cn", ""));
        let source = source(transport.clone());
        let listings: Vec<Listing> = (0..20)
            .map(|i| Listing {
                symbol: Box::leak(format!("sh6000{:02}", i).into_boxed_str()),
                code: "X",
                name: "X",
            })
            .collect();

        let quotes = source.fetch_quotes(&listings, AssetClass::Indices).await;
        assert!(quotes.is_empty());
        assert_eq!(transport.total_calls(), 2);

        let urls: Vec<String> = transport.requests().iter().map(|r| r.url.clone()).collect();
        assert_eq!(urls[0].matches(',').count(), CHUNK_SIZE - 1);
        assert_eq!(urls[1].matches(',').count(), 4);
    }

    #[tokio::test]
    async fn test_fresh_symbols_are_not_requested_again() {
        let body = format!(
            "v_sh000001=\"{}\";\nv_sz399001=\"{}\";",
            index_value("3150.20", "3162.50"),
            index_value("11230.40", "11184.80")
        );
        let transport = Arc::new(ScriptedTransport::new().ok("qt.gtimg.cn", &body));
        let source = source(transport.clone());

        let first = source
            .fetch_quotes(&TENCENT_A_SHARE_INDICES[..2], AssetClass::Indices)
            .await;
        assert_eq!(first.len(), 2);
        assert_eq!(first["000001.SH"].last, dec!(3150.20));
        assert_eq!(first["000001.SH"].change, dec!(-12.30));
        assert_eq!(first["000001.SH"].name, "上证综指");

        let second = source
            .fetch_quotes(&TENCENT_A_SHARE_INDICES[..2], AssetClass::Indices)
            .await;
        assert_eq!(second, first);
        assert_eq!(transport.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_futures_are_parsed() {
        let body = "v_hf_CL=\"58.35,-0.65,59.00,58.90,59.20,58.10,14:30:00,58.34,58.36,0,0,0,2025-03-07,WTI\";";
        let transport = Arc::new(ScriptedTransport::new().ok("qt.gtimg.cn", body));
        let source = source(transport);

        let quotes = source.fetch_futures(TENCENT_FUTURES).await;
        assert_eq!(quotes.len(), 1);
        let crude = &quotes["CL.NYM"];
        assert_eq!(crude.prev_close, dec!(59.00));
        assert_eq!(crude.change_pct, dec!(-1.10));
    }

    #[tokio::test]
    async fn test_failed_request_yields_empty_map() {
        let transport = Arc::new(ScriptedTransport::new().status("qt.gtimg.cn", 502));
        let source = source(transport.clone());
        let quotes = source
            .fetch_quotes(TENCENT_A_SHARE_INDICES, AssetClass::Indices)
            .await;
        assert!(quotes.is_empty());
        assert_eq!(transport.total_calls(), 2);
    }
}
