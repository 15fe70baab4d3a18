//! Multi-source provider built on open upstream feeds.
//!
//! Each asset class has its own chain: live sources first, secondary sources
//! for whatever is still missing, and the deterministic dataset when nothing
//! live came back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};

use super::merge::merge_by_recency;
use super::{DeterministicProvider, MarketDataProvider};
use crate::calendar::{filter_window, CalendarWaterfall};
use crate::models::{AssetClass, CalendarEvent, QuoteMap, ShortTermBoards};
use crate::sources::catalog::{
    missing_from, COINGECKO_COINS, FX_PAIRS, STOOQ_INDICES, STOOQ_US_STOCKS,
    TENCENT_A_SHARE_INDICES, TENCENT_FUTURES, TENCENT_GLOBAL_INDICES, TENCENT_US_STOCKS,
    YAHOO_COMMODITIES, YAHOO_RATES,
};
use crate::sources::{
    ChinaBondSource, CoinGeckoSource, EastmoneySource, FredSource, FxRatesSource, Listing,
    LprSource, StooqSource, TencentSource, YahooChartSource,
};
use crate::transport::HttpTransport;

pub const PROVIDER_ID: &str = "OPEN";

const BOARD_SOURCE: &str = "eastmoney";
const BOARD_LIMIT: usize = 6;

pub struct AggregatedProvider {
    fallback: DeterministicProvider,
    tencent: TencentSource,
    stooq: StooqSource,
    fx: FxRatesSource,
    yahoo: YahooChartSource,
    chinabond: ChinaBondSource,
    fred: FredSource,
    lpr: LprSource,
    coingecko: CoinGeckoSource,
    eastmoney: EastmoneySource,
    calendar: CalendarWaterfall,
}

impl AggregatedProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            fallback: DeterministicProvider::new(),
            tencent: TencentSource::new(transport.clone()),
            stooq: StooqSource::new(transport.clone()),
            fx: FxRatesSource::new(transport.clone()),
            yahoo: YahooChartSource::new(transport.clone()),
            chinabond: ChinaBondSource::new(transport.clone()),
            fred: FredSource::new(transport.clone()),
            lpr: LprSource,
            coingecko: CoinGeckoSource::new(transport.clone()),
            eastmoney: EastmoneySource::new(transport.clone()),
            calendar: CalendarWaterfall::new(transport),
        }
    }

    /// Quotes from Stooq for every listing `payload` does not have yet.
    async fn fill_from_stooq(
        &self,
        payload: &mut QuoteMap,
        listings: &[Listing],
        class: AssetClass,
    ) {
        let missing = missing_from(listings, |code| payload.contains_key(code));
        if missing.is_empty() {
            return;
        }
        let filled = self.stooq.fetch_quotes(&missing, class).await;
        info!(
            "Stooq filled {}/{} missing {} codes",
            filled.len(),
            missing.len(),
            class
        );
        payload.extend(filled);
    }
}

#[async_trait]
impl MarketDataProvider for AggregatedProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    /// Deterministic base, overlaid with Tencent A-share then global
    /// indices, then Stooq for codes still missing.
    async fn fetch_indices(&self) -> QuoteMap {
        let mut payload = self.fallback.fetch_indices().await;
        let (a_share, global) = futures::join!(
            self.tencent.fetch_quotes(TENCENT_A_SHARE_INDICES, AssetClass::Indices),
            self.tencent.fetch_quotes(TENCENT_GLOBAL_INDICES, AssetClass::Indices),
        );
        payload.extend(a_share);
        payload.extend(global);
        self.fill_from_stooq(&mut payload, STOOQ_INDICES, AssetClass::Indices)
            .await;
        payload
    }

    async fn fetch_fx(&self) -> QuoteMap {
        let quotes = self.fx.fetch_quotes(FX_PAIRS).await;
        if quotes.is_empty() {
            warn!("No FX cross rates, using deterministic FX");
            return self.fallback.fetch_fx().await;
        }
        quotes
    }

    /// Yahoo yields merged by recency with ChinaBond, FRED and LPR.
    async fn fetch_rates(&self) -> QuoteMap {
        let (yahoo, chinabond, fred, lpr) = futures::join!(
            self.yahoo.fetch_quotes(YAHOO_RATES, AssetClass::Rates),
            self.chinabond.fetch_quotes(),
            self.fred.fetch_quotes(),
            self.lpr.fetch_quotes(),
        );
        let merged = [chinabond, fred, lpr]
            .into_iter()
            .fold(yahoo, merge_by_recency);
        if merged.is_empty() {
            warn!("No live rates, using deterministic rates");
            return self.fallback.fetch_rates().await;
        }
        merged
    }

    async fn fetch_commodities(&self) -> QuoteMap {
        let quotes = self
            .yahoo
            .fetch_quotes(YAHOO_COMMODITIES, AssetClass::Commodities)
            .await;
        if !quotes.is_empty() {
            return quotes;
        }
        let futures = self.tencent.fetch_futures(TENCENT_FUTURES).await;
        if !futures.is_empty() {
            info!("Commodities served from Tencent futures");
            return futures;
        }
        warn!("No live commodities, using deterministic commodities");
        self.fallback.fetch_commodities().await
    }

    async fn fetch_us_stocks(&self) -> QuoteMap {
        let mut payload = self.fallback.fetch_us_stocks().await;
        payload.extend(
            self.tencent
                .fetch_quotes(TENCENT_US_STOCKS, AssetClass::UsStocks)
                .await,
        );
        self.fill_from_stooq(&mut payload, STOOQ_US_STOCKS, AssetClass::UsStocks)
            .await;
        payload
    }

    async fn fetch_crypto(&self) -> QuoteMap {
        let quotes = self.coingecko.fetch_quotes().await;
        if quotes.is_empty() {
            warn!(
                "No crypto prices for {} coins, using deterministic crypto",
                COINGECKO_COINS.len()
            );
            return self.fallback.fetch_crypto().await;
        }
        quotes
    }

    /// Waterfall events; the deterministic events when every feed failed,
    /// unfiltered if the window would leave nothing.
    async fn fetch_calendar(&self) -> Vec<CalendarEvent> {
        let events = self.calendar.fetch_events().await;
        if !events.is_empty() {
            return events;
        }
        let fallback = self.fallback.fetch_calendar().await;
        let in_window = filter_window(&fallback, Utc::now());
        if in_window.is_empty() {
            fallback
        } else {
            in_window
        }
    }

    async fn fetch_a_share_short_term(&self) -> ShortTermBoards {
        let boards = self.eastmoney.fetch_boards().await;
        if boards.is_empty() {
            warn!("No board rankings, using deterministic boards");
            return self.fallback.fetch_a_share_short_term().await;
        }
        ShortTermBoards::rank(&boards, BOARD_LIMIT, BOARD_SOURCE, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;

    fn provider(transport: ScriptedTransport) -> (AggregatedProvider, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        (AggregatedProvider::new(transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_fx_from_cross_rates() {
        let body = r#"{"result":"success","time_last_update_unix":1741305601,
            "rates":{"USD":1,"CNY":7.2468,"CNH":7.2501,"EUR":0.9251,"JPY":147.9,"HKD":7.7712,"GBP":0.7761}}"#;
        let (provider, _) = provider(ScriptedTransport::new().ok("open.er-api.com", body));

        let fx = provider.fetch_fx().await;
        assert_eq!(fx.len(), FX_PAIRS.len());
        assert!(fx.values().all(|q| q.source == "EXCHANGERATE"));
    }

    #[tokio::test]
    async fn test_fx_outage_uses_deterministic() {
        let (provider, _) = provider(ScriptedTransport::new().status("open.er-api.com", 503));
        let fx = provider.fetch_fx().await;
        assert!(!fx.is_empty());
        assert!(fx.values().all(|q| q.source == "MOCK"));
    }

    #[tokio::test]
    async fn test_indices_outage_keeps_deterministic_base() {
        let (provider, transport) = provider(
            ScriptedTransport::new()
                .status("qt.gtimg.cn", 404)
                .status("stooq.com", 404),
        );

        let indices = provider.fetch_indices().await;
        assert_eq!(indices["000001.SH"].source, "MOCK");
        assert!(indices.contains_key("DAX.GI"));
        // Only codes absent from the base reach Stooq
        let stooq_url = transport
            .requests()
            .into_iter()
            .find(|r| r.url.contains("stooq.com"))
            .unwrap()
            .full_url();
        assert!(stooq_url.contains("%5En225"));
        assert!(!stooq_url.contains("%5Espx"));
    }

    #[tokio::test]
    async fn test_rates_merge_live_sources() {
        let (provider, _) = provider(
            ScriptedTransport::new()
                .ok("id=DGS10", "observation_date,DGS10\n2025-03-04,4.22\n2025-03-05,4.28\n")
                .status("fredgraph", 404)
                .status("yahoo.com", 404)
                .status("chinabond", 404),
        );

        let rates = provider.fetch_rates().await;
        assert_eq!(rates.len(), 1);
        assert_eq!(rates["UST10Y.GBM"].last, dec!(4.28));
        assert_eq!(rates["UST10Y.GBM"].source, "FRED");
    }

    #[tokio::test]
    async fn test_rates_outage_uses_deterministic() {
        let (provider, _) = provider(
            ScriptedTransport::new()
                .status("yahoo.com", 404)
                .status("chinabond", 404)
                .status("fredgraph", 404),
        );

        let rates = provider.fetch_rates().await;
        let expected = DeterministicProvider::new().fetch_rates().await;
        assert!(rates.keys().eq(expected.keys()));
        assert!(rates.values().all(|q| q.source == "MOCK"));
    }

    #[tokio::test]
    async fn test_boards_ranked_from_eastmoney() {
        let body = r#"{"data":{"diff":[
            {"f12":"BK0470","f14":"半导体","f3":2.8,"f62":125000},
            {"f12":"BK0491","f14":"光伏","f3":-1.4,"f62":-38000},
            {"f12":"BK0600","f14":"券商","f3":1.1}]}}"#;
        let (provider, _) = provider(ScriptedTransport::new().ok("eastmoney.com", body));

        let boards = provider.fetch_a_share_short_term().await;
        assert_eq!(boards.source, "eastmoney");
        assert_eq!(boards.hot_boards[0].code, "BK0470");
        assert_eq!(boards.cold_boards[0].code, "BK0491");
        assert_eq!(boards.capital_boards.len(), 2);
    }
}
