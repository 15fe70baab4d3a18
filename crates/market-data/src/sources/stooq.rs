//! Stooq light quotes, used to fill indices and US stocks other feeds missed.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use super::catalog::Listing;
use crate::fetch::{SourceClient, TtlCache};
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{normalize, stooq, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "STOOQ";

const ENDPOINT: &str = "https://stooq.com/q/l/";
const FIELDS: &str = "sd2t2ohlcv";
const CACHE_TTL: Duration = Duration::from_secs(15);

pub struct StooqSource {
    client: SourceClient,
    /// Draft per uppercase symbol; `None` caches a symbol Stooq had no data for
    cache: TtlCache<String, Option<RawQuote>>,
}

impl StooqSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_client(SourceClient::new(SOURCE_ID, transport))
    }

    pub(crate) fn with_client(client: SourceClient) -> Self {
        Self {
            client,
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    fn batch_url(symbols: &[String]) -> String {
        let joined = symbols
            .iter()
            .map(|s| urlencoding::encode(&s.to_lowercase()).into_owned())
            .collect::<Vec<_>>()
            .join("+");
        format!("{}?s={}&f={}&e=csv&i=d", ENDPOINT, joined, FIELDS)
    }

    /// Quotes for `listings`, one batched request for every stale symbol.
    pub async fn fetch_quotes(&self, listings: &[Listing], class: AssetClass) -> QuoteMap {
        if listings.is_empty() {
            return QuoteMap::new();
        }
        let symbols: Vec<String> = listings.iter().map(|l| l.symbol.to_uppercase()).collect();
        let (mut drafts, pending) = self.cache.partition(&symbols);

        if pending.is_empty() {
            debug!("{} served {} symbols from cache", SOURCE_ID, drafts.len());
        } else if let Some(body) = self
            .client
            .get_text(&HttpRequest::get(Self::batch_url(&pending)))
            .await
        {
            let mut parsed = stooq::parse_csv(&body);
            for symbol in pending {
                let draft = parsed.remove(&symbol);
                self.cache.insert(symbol.clone(), draft.clone());
                drafts.insert(symbol, draft);
            }
        }

        let quotes: QuoteMap = listings
            .iter()
            .filter_map(|listing| {
                let draft = drafts.get(&listing.symbol.to_uppercase())?.clone()?;
                let label = QuoteLabel::new(listing.code, listing.name, SOURCE_ID);
                normalize(draft, label, class.precision()).map(|q| (q.code.clone(), q))
            })
            .collect();

        info!("{} returned {}/{} quotes", SOURCE_ID, quotes.len(), listings.len());
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RetryPolicy;
    use crate::sources::catalog::STOOQ_US_STOCKS;
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;

    fn source(transport: Arc<ScriptedTransport>) -> StooqSource {
        StooqSource::with_client(
            SourceClient::new(SOURCE_ID, transport).with_retry(RetryPolicy::new(2, Duration::ZERO)),
        )
    }

    #[test]
    fn test_batch_url_lowercases_and_encodes() {
        let url = StooqSource::batch_url(&["^SPX".to_string(), "AAPL.US".to_string()]);
        assert_eq!(
            url,
            "https://stooq.com/q/l/?s=%5Espx+aapl.us&f=sd2t2ohlcv&e=csv&i=d"
        );
    }

    #[tokio::test]
    async fn test_missing_symbols_are_cached_as_empty() {
        let body = "AAPL.US,20250307,220000,187,189.5,186.2,188.2,51234567\n\
                    MSFT.US,N/D,N/D,N/D,N/D,N/D,N/D,N/D\n";
        let transport = Arc::new(ScriptedTransport::new().ok("stooq.com", body));
        let source = source(transport.clone());

        let quotes = source
            .fetch_quotes(&STOOQ_US_STOCKS[..2], AssetClass::UsStocks)
            .await;
        assert_eq!(quotes.len(), 1);
        let apple = &quotes["AAPL.O"];
        assert_eq!(apple.last, dec!(188.2));
        assert_eq!(apple.prev_close, dec!(187));
        assert_eq!(apple.change, dec!(1.20));
        assert_eq!(apple.source, "STOOQ");

        let again = source
            .fetch_quotes(&STOOQ_US_STOCKS[..2], AssetClass::UsStocks)
            .await;
        assert_eq!(again.len(), 1);
        assert_eq!(transport.total_calls(), 1);
    }
}
