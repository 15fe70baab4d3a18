//! Fixed, reproducible dataset used offline and as the last fallback of the
//! live providers.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::MarketDataProvider;
use crate::models::{AssetClass, BoardEntry, CalendarEvent, QuoteMap, ShortTermBoards};
use crate::normalizer::{normalize, parse_decimal, QuoteLabel, RawQuote};

pub const PROVIDER_ID: &str = "MOCK";

const BOARD_SOURCE: &str = "mock";
const BOARD_LIMIT: usize = 4;

/// `(code, name, last, change, change_pct, prev_close, volume)`
type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
);

const INDICES: &[Row] = &[
    ("000001.SH", "上证综指", "3150.2", "-12.3", Some("-0.39"), Some("3162.5"), None),
    ("399001.SZ", "深证成指", "11230.4", "45.6", Some("0.41"), Some("11184.8"), None),
    ("000300.SH", "沪深300", "4188.7", "-8.4", Some("-0.20"), Some("4197.1"), None),
    ("000852.SH", "中证1000", "7205.3", "35.2", Some("0.49"), Some("7170.1"), None),
    ("000016.SH", "上证50", "2852.1", "-5.6", Some("-0.20"), Some("2857.7"), None),
    ("000905.SH", "中证500", "6120.4", "28.7", Some("0.47"), Some("6091.7"), None),
    ("SPX.GI", "标普500", "5235.4", "12.1", Some("0.23"), Some("5223.3"), None),
    ("NDXTMC.GI", "纳指100等权", "2233.2", "-5.4", Some("-0.24"), Some("2238.6"), None),
    ("HSI.HI", "恒生指数", "18230.5", "86.2", Some("0.48"), Some("18144.3"), None),
    ("SX5E.GI", "欧元区50", "4850.4", "-15.2", Some("-0.31"), Some("4865.6"), None),
    ("UKX.GI", "富时100", "7950.3", "22.4", Some("0.28"), Some("7927.9"), None),
    ("CAC.GI", "法国CAC40", "7288.1", "-12.6", Some("-0.17"), Some("7300.7"), None),
    ("DAX.GI", "德国DAX", "18750.8", "65.1", Some("0.35"), Some("18685.7"), None),
];

const FX: &[Row] = &[
    ("USDCNH.FX", "USD/CNH", "7.1123", "-0.0045", Some("-0.06"), None, None),
    ("EURUSD.FX", "EUR/USD", "1.0812", "0.0008", Some("0.07"), None, None),
    ("USDJPY.FX", "USD/JPY", "157.12", "-0.42", Some("-0.27"), None, None),
    ("USDX.FX", "美元指数", "100.25", "0.05", Some("0.05"), None, None),
];

const RATES: &[Row] = &[
    ("M0000017.SH", "中国国债10Y", "2.69", "-0.01", None, None, None),
    ("M0000025.SH", "中国国债5Y", "2.48", "0", None, None, None),
    ("M0000007.SH", "中国国债3Y", "2.32", "0", None, None, None),
    ("UST10Y.GBM", "美国国债10Y", "3.98", "0.02", None, None, None),
    ("UST2Y.GBM", "美国国债2Y", "4.32", "0.01", None, None, None),
    ("LPR1Y.IR", "LPR 1Y", "3.45", "0", None, None, None),
    ("LPR5Y.IR", "LPR 5Y", "3.95", "0", None, None, None),
];

const COMMODITIES: &[Row] = &[
    ("GC.CMX", "COMEX Gold", "4067.1", "7.1", Some("0.17"), None, Some("128464")),
    ("CL.NYM", "NYMEX Crude", "58.35", "-0.65", Some("-1.10"), None, Some("127165")),
    ("TA.CZC", "PTA 主力", "4642", "-36", Some("-0.77"), None, Some("161257")),
    ("RB.SHF", "螺纹钢 主力", "3054", "-6", Some("-0.20"), None, Some("129603")),
    ("HG.CMX", "COMEX Copper", "4.9745", "0.006", Some("0.12"), None, Some("20788")),
];

const US_STOCKS: &[Row] = &[
    ("DJI.GI", "道琼斯", "38500.2", "85.3", Some("0.22"), None, None),
    ("SPX.GI", "标普500", "5235.4", "12.1", Some("0.23"), None, None),
    ("IXIC.GI", "纳斯达克", "15980.6", "-42.8", Some("-0.27"), None, None),
    ("AAPL.O", "苹果", "188.2", "1.2", Some("0.64"), None, None),
    ("MSFT.O", "微软", "332.5", "0.8", Some("0.24"), None, None),
];

const CRYPTO: &[Row] = &[
    ("BTC.CC", "比特币", "63000", "750", Some("1.2"), None, None),
    ("ETH.CC", "以太坊", "3100", "-25", Some("-0.8"), None, None),
    ("SOL.CC", "Solana", "155", "5.2", Some("3.4"), None, None),
    ("DOGE.CC", "Dogecoin", "0.17", "-0.002", Some("-1.1"), None, None),
];

/// `(code, name, change_pct, net_flow)`
const BOARDS: &[(&str, &str, &str, &str)] = &[
    ("BK0470", "半导体", "2.8", "12.5"),
    ("BK0428", "算力", "1.9", "9.4"),
    ("BK0600", "券商", "1.1", "5.3"),
    ("BK0804", "新能源车", "-0.6", "-2.1"),
    ("BK0491", "光伏", "-1.4", "-3.8"),
];

/// Builds one class of quotes. A row without a previous close gets
/// `last - change`.
fn quote_map(rows: &[Row], class: AssetClass, stamped_at: DateTime<Utc>) -> QuoteMap {
    rows.iter()
        .filter_map(|&(code, name, last, change, pct, prev_close, volume)| {
            let draft = RawQuote {
                last: parse_decimal(last),
                change: parse_decimal(change),
                change_pct: pct.and_then(parse_decimal),
                prev_close: prev_close.and_then(parse_decimal),
                volume: volume.and_then(parse_decimal),
                timestamp: Some(stamped_at),
                ..Default::default()
            }
            .with_prev_close_from_change();
            let label = QuoteLabel::new(code, name, PROVIDER_ID);
            normalize(draft, label, class.precision()).map(|q| (q.code.clone(), q))
        })
        .collect()
}

fn boards() -> Vec<BoardEntry> {
    BOARDS
        .iter()
        .map(|&(code, name, pct, flow)| BoardEntry {
            code: code.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            change_pct: parse_decimal(pct),
            net_flow: parse_decimal(flow),
            turnover_rate: None,
        })
        .collect()
}

/// Deterministic provider. All quotes carry the construction time, so two
/// calls on the same instance return identical data.
#[derive(Debug, Clone)]
pub struct DeterministicProvider {
    stamped_at: DateTime<Utc>,
    indices: QuoteMap,
    fx: QuoteMap,
    rates: QuoteMap,
    commodities: QuoteMap,
    us_stocks: QuoteMap,
    crypto: QuoteMap,
}

impl DeterministicProvider {
    pub fn new() -> Self {
        Self::stamped_at(Utc::now())
    }

    pub fn stamped_at(stamped_at: DateTime<Utc>) -> Self {
        Self {
            stamped_at,
            indices: quote_map(INDICES, AssetClass::Indices, stamped_at),
            fx: quote_map(FX, AssetClass::Fx, stamped_at),
            rates: quote_map(RATES, AssetClass::Rates, stamped_at),
            commodities: quote_map(COMMODITIES, AssetClass::Commodities, stamped_at),
            us_stocks: quote_map(US_STOCKS, AssetClass::UsStocks, stamped_at),
            crypto: quote_map(CRYPTO, AssetClass::Crypto, stamped_at),
        }
    }

    /// Two upcoming releases relative to `now`.
    pub fn events_at(now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let event = |id: &str, title: &str, country: &str, offset_days: i64, importance: &str| {
            CalendarEvent {
                event_id: id.to_string(),
                title: title.to_string(),
                country: Some(country.to_string()),
                datetime: now + Duration::days(offset_days),
                importance: Some(importance.to_string()),
                forecast: None,
                previous: None,
                actual: None,
                source: BOARD_SOURCE.to_string(),
            }
        };
        vec![
            CalendarEvent {
                forecast: Some("200k".to_string()),
                previous: Some("210k".to_string()),
                ..event("NFP", "美国非农就业", "US", 2, "high")
            },
            CalendarEvent {
                forecast: Some("0.8%".to_string()),
                previous: Some("0.6%".to_string()),
                ..event("CPI_CN", "中国CPI同比", "CN", 3, "medium")
            },
        ]
    }

    pub fn short_term_boards(&self) -> ShortTermBoards {
        ShortTermBoards::rank(&boards(), BOARD_LIMIT, BOARD_SOURCE, self.stamped_at)
    }
}

impl Default for DeterministicProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for DeterministicProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_indices(&self) -> QuoteMap {
        self.indices.clone()
    }

    async fn fetch_fx(&self) -> QuoteMap {
        self.fx.clone()
    }

    async fn fetch_rates(&self) -> QuoteMap {
        self.rates.clone()
    }

    async fn fetch_commodities(&self) -> QuoteMap {
        self.commodities.clone()
    }

    async fn fetch_us_stocks(&self) -> QuoteMap {
        self.us_stocks.clone()
    }

    async fn fetch_crypto(&self) -> QuoteMap {
        self.crypto.clone()
    }

    /// Event times follow the wall clock so the fallback stays upcoming.
    async fn fetch_calendar(&self) -> Vec<CalendarEvent> {
        Self::events_at(Utc::now())
    }

    async fn fetch_a_share_short_term(&self) -> ShortTermBoards {
        self.short_term_boards()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn provider() -> DeterministicProvider {
        DeterministicProvider::stamped_at(Utc.with_ymd_and_hms(2025, 3, 7, 8, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let provider = provider();
        assert_eq!(provider.fetch_indices().await, provider.fetch_indices().await);
        assert_eq!(provider.fetch_rates().await, provider.fetch_rates().await);
    }

    #[tokio::test]
    async fn test_indices_keep_reported_fields() {
        let indices = provider().fetch_indices().await;
        assert_eq!(indices.len(), INDICES.len());
        let sse = &indices["000001.SH"];
        assert_eq!(sse.last, dec!(3150.2));
        assert_eq!(sse.prev_close, dec!(3162.5));
        assert_eq!(sse.change_pct, dec!(-0.39));
        assert_eq!(sse.source, PROVIDER_ID);
        assert!(sse.open.is_none());
    }

    #[tokio::test]
    async fn test_prev_close_recovered_from_change() {
        let rates = provider().fetch_rates().await;
        let cgb = &rates["M0000017.SH"];
        assert_eq!(cgb.prev_close, dec!(2.70));
        assert_eq!(cgb.change, dec!(-0.01));

        let fx = provider().fetch_fx().await;
        assert_eq!(fx["USDCNH.FX"].prev_close, dec!(7.1168));

        let commodities = provider().fetch_commodities().await;
        assert_eq!(commodities["GC.CMX"].volume, Some(dec!(128464)));
    }

    #[tokio::test]
    async fn test_boards_ranked_top_four() {
        let boards = provider().fetch_a_share_short_term().await;
        assert_eq!(boards.source, "mock");
        assert_eq!(boards.hot_boards.len(), 4);
        assert_eq!(boards.hot_boards[0].code, "BK0470");
        assert_eq!(boards.cold_boards[0].code, "BK0491");
        assert_eq!(boards.capital_boards[0].net_flow, Some(dec!(12.5)));
    }

    #[test]
    fn test_events_are_upcoming() {
        let now = Utc::now();
        let events = DeterministicProvider::events_at(now);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.datetime > now));
        assert_eq!(events[0].event_id, "NFP");
    }
}
