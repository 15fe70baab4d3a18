//! Yahoo chart quotes for commodity futures and US Treasury yields.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::info;

use super::catalog::Listing;
use crate::fetch::{SourceClient, TtlCache};
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{normalize, yahoo, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "YAHOO";

const ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const CACHE_TTL: Duration = Duration::from_secs(30);

pub struct YahooChartSource {
    client: SourceClient,
    cache: TtlCache<&'static str, RawQuote>,
}

impl YahooChartSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    async fn fetch_chart(&self, symbol: &'static str) -> Option<RawQuote> {
        if let Some(cached) = self.cache.get_fresh(&symbol) {
            return Some(cached);
        }
        let request = HttpRequest::get(format!("{}/{}", ENDPOINT, urlencoding::encode(symbol)))
            .query("range", "1d")
            .query("interval", "5m");
        let payload = self.client.get_json(&request).await?;
        let draft = yahoo::parse_chart(&payload)?;
        self.cache.insert(symbol, draft.clone());
        Some(draft)
    }

    /// Chart quotes for `listings`, requested concurrently.
    pub async fn fetch_quotes(&self, listings: &[Listing], class: AssetClass) -> QuoteMap {
        let drafts = join_all(listings.iter().map(|l| self.fetch_chart(l.symbol))).await;

        let quotes: QuoteMap = listings
            .iter()
            .zip(drafts)
            .filter_map(|(listing, draft)| {
                let label = QuoteLabel::new(listing.code, listing.name, SOURCE_ID);
                normalize(draft?, label, class.precision()).map(|q| (q.code.clone(), q))
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
    use crate::sources::catalog::YAHOO_RATES;
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;

    const TNX: &str = r#"{"chart":{"result":[{"meta":{
        "regularMarketPrice":4.287,"previousClose":4.251,"regularMarketTime":1741377600}}],"error":null}}"#;

    #[tokio::test]
    async fn test_rates_with_class_precision() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .ok("%5ETNX", TNX)
                .status("%5EFVX", 404)
                .status("%5EIRX", 404),
        );
        let source = YahooChartSource::new(transport.clone());

        let quotes = source.fetch_quotes(YAHOO_RATES, AssetClass::Rates).await;
        assert_eq!(quotes.len(), 1);
        let ten_year = &quotes["UST10Y.GBM"];
        assert_eq!(ten_year.last, dec!(4.287));
        assert_eq!(ten_year.change, dec!(0.036));
        assert_eq!(ten_year.change_pct, dec!(0.85));
        assert_eq!(ten_year.source, "YAHOO");

        source.fetch_quotes(&YAHOO_RATES[..1], AssetClass::Rates).await;
        assert_eq!(transport.calls("%5ETNX"), 1);
    }
}
