//! Proprietary terminal provider.
//!
//! The terminal is reached through an opaque [`TerminalSession`]. Every call
//! makes sure the session is connected first, reconnecting on demand, and
//! serves the deterministic dataset whenever the terminal cannot answer.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};

use super::{DeterministicProvider, MarketDataProvider};
use crate::calendar::filter_window;
use crate::errors::MarketDataError;
use crate::models::{AssetClass, CalendarEvent, QuoteMap, ShortTermBoards};
use crate::normalizer::matrix::matrix_to_raw;
use crate::normalizer::{normalize, FieldMatrix, QuoteLabel};

pub const PROVIDER_ID: &str = "TERMINAL";

const INDEX_CODES: &[&str] = &[
    "000001.SH", "399001.SZ", "399006.SZ", "000300.SH", "000852.SH", "000016.SH",
    "932000.CSI", "899050.BJ", "SPX.GI", "IXIC.GI", "NDXTMC.GI", "DJI.GI", "HSI.HI",
    "N225.GI", "FTSE.GI", "GDAXI.GI", "RTSI.GI",
];

const FX_CODES: &[&str] = &[
    "USDCNY.IB", "USDCNH.FX", "USDX.FX", "EURUSD.FX", "USDJPY.FX", "GBPUSD.FX",
    "USDCAD.FX", "AUDUSD.FX", "NZDUSD.FX", "USDCHF.FX",
];

const RATE_CODES: &[&str] = &[
    "LPR1Y.IR", "LPR5Y.IR", "SHIBORON.IR", "SHIBOR1W.IR", "SHIBOR1M.IR", "SHIBOR3M.IR",
    "SHIBOR1Y.IR", "TB1Y.WI", "TB3Y.WI", "TB5Y.WI", "TB7Y.WI", "TB10Y.WI", "UST2Y.GBM",
    "UST5Y.GBM", "UST10Y.GBM", "UST30Y.GBM",
];

const COMMODITY_CODES: &[&str] = &[
    "GC.CMX", "SI.CMX", "HG.CMX", "ALI.CMX", "CL.NYM", "PL.NYM", "NG.NYM", "TA.CZC",
    "J.DCE", "SA.CZC", "S.CBT", "C.CBT", "W.CBT", "ZE.CBT", "LH.DCE", "RB.SHF",
];

const US_STOCK_CODES: &[&str] = &[
    "DJI.GI", "SPX.GI", "IXIC.GI", "AAPL.O", "MSFT.O", "GOOGL.O", "TSLA.O", "AMZN.O",
];

const NAMES: &[(&str, &str)] = &[
    ("000001.SH", "上证综指"),
    ("399001.SZ", "深证成指"),
    ("399006.SZ", "创业板指"),
    ("000300.SH", "沪深300"),
    ("000852.SH", "中证1000"),
    ("000016.SH", "上证50"),
    ("932000.CSI", "中证全指金融"),
    ("899050.BJ", "北证50"),
    ("SPX.GI", "标普500"),
    ("IXIC.GI", "纳斯达克综合"),
    ("NDXTMC.GI", "纳指100等权"),
    ("DJI.GI", "道琼斯"),
    ("HSI.HI", "恒生指数"),
    ("N225.GI", "日经225"),
    ("FTSE.GI", "富时100"),
    ("GDAXI.GI", "德国DAX"),
    ("RTSI.GI", "俄罗斯RTS"),
    ("USDX.FX", "美元指数"),
    ("AAPL.O", "苹果"),
    ("MSFT.O", "微软"),
    ("GOOGL.O", "谷歌"),
    ("TSLA.O", "特斯拉"),
    ("AMZN.O", "亚马逊"),
];

fn display_name(code: &str) -> &str {
    NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, name)| *name)
}

/// Realtime fields and their snapshot equivalents for one query.
struct FieldSet {
    realtime: &'static [&'static str],
    snapshot: &'static [&'static str],
}

const PRICE_FIELDS: FieldSet = FieldSet {
    realtime: &["rt_last", "rt_chg", "rt_pct_chg", "rt_open", "rt_high", "rt_low", "rt_pre_close"],
    snapshot: &["close", "pct_chg", "chg", "open", "high", "low", "pre_close"],
};

const FX_FIELDS: FieldSet = FieldSet {
    realtime: &["rt_last", "rt_chg", "rt_pct_chg"],
    snapshot: &["close", "chg", "pct_chg"],
};

const RATE_FIELDS: FieldSet = FieldSet {
    realtime: &["rt_last", "rt_chg"],
    snapshot: &["close", "chg"],
};

const VOLUME_FIELDS: FieldSet = FieldSet {
    realtime: &["rt_last", "rt_chg", "rt_pct_chg", "rt_vol"],
    snapshot: &["close", "chg", "pct_chg", "pre_close", "volume"],
};

/// Opaque session with a market data terminal.
///
/// Query results are field-major: one series per requested field, each
/// indexed like `codes`.
#[async_trait]
pub trait TerminalSession: Send + Sync {
    async fn start(&self) -> Result<(), MarketDataError>;

    /// Realtime query.
    async fn realtime(
        &self,
        codes: &[&str],
        fields: &[&str],
    ) -> Result<FieldMatrix, MarketDataError>;

    /// Last snapshot, used when realtime data is unavailable.
    async fn snapshot(
        &self,
        codes: &[&str],
        fields: &[&str],
    ) -> Result<FieldMatrix, MarketDataError>;
}

/// Session used when no terminal is installed. It never connects.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTerminal;

#[async_trait]
impl TerminalSession for UnavailableTerminal {
    async fn start(&self) -> Result<(), MarketDataError> {
        Err(MarketDataError::TerminalUnavailable(
            "no terminal session is installed".to_string(),
        ))
    }

    async fn realtime(
        &self,
        _codes: &[&str],
        _fields: &[&str],
    ) -> Result<FieldMatrix, MarketDataError> {
        Err(MarketDataError::TerminalUnavailable("not connected".to_string()))
    }

    async fn snapshot(
        &self,
        _codes: &[&str],
        _fields: &[&str],
    ) -> Result<FieldMatrix, MarketDataError> {
        Err(MarketDataError::TerminalUnavailable("not connected".to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

pub struct TerminalProvider {
    session: Arc<dyn TerminalSession>,
    state: Mutex<ConnectionState>,
    fallback: DeterministicProvider,
}

impl TerminalProvider {
    pub fn new(session: Arc<dyn TerminalSession>) -> Self {
        Self {
            session,
            state: Mutex::new(ConnectionState::Disconnected),
            fallback: DeterministicProvider::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableTerminal))
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Terminal state mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn state(&self) -> ConnectionState {
        *self.lock_state()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.lock_state() = state;
    }

    /// Connects if needed. Returns whether the session is usable.
    async fn ensure_connected(&self) -> bool {
        if self.state() == ConnectionState::Connected {
            return true;
        }
        self.set_state(ConnectionState::Connecting);
        match self.session.start().await {
            Ok(()) => {
                info!("Terminal session connected");
                self.set_state(ConnectionState::Connected);
                true
            }
            Err(e) => {
                warn!("Terminal session could not start: {}", e);
                self.set_state(ConnectionState::Disconnected);
                false
            }
        }
    }

    /// Realtime query, falling back to the snapshot query when the realtime
    /// answer fails or is all zeros.
    async fn query(&self, codes: &[&str], fields: &FieldSet) -> Option<FieldMatrix> {
        match self.session.realtime(codes, fields.realtime).await {
            Ok(matrix) if !matrix.is_all_zero() => return Some(matrix),
            Ok(_) => info!("Terminal realtime answer was all zeros, using snapshot"),
            Err(e) => warn!("Terminal realtime query failed: {}", e),
        }
        match self.session.snapshot(codes, fields.snapshot).await {
            Ok(matrix) => Some(matrix),
            Err(e) => {
                warn!("Terminal snapshot query failed: {}", e);
                if matches!(e, MarketDataError::TerminalUnavailable(_)) {
                    self.set_state(ConnectionState::Disconnected);
                }
                None
            }
        }
    }

    /// Quotes for `codes`, or `None` when the terminal had nothing usable.
    async fn quotes(
        &self,
        codes: &[&str],
        fields: &FieldSet,
        class: AssetClass,
    ) -> Option<QuoteMap> {
        if !self.ensure_connected().await {
            return None;
        }
        let matrix = self.query(codes, fields).await?;
        let quotes: QuoteMap = matrix_to_raw(codes, &matrix)
            .into_iter()
            .filter_map(|(code, raw)| {
                let label = QuoteLabel::new(&code, display_name(&code), PROVIDER_ID);
                normalize(raw, label, class.precision())
            })
            .map(|quote| (quote.code.clone(), quote))
            .collect();
        (!quotes.is_empty()).then_some(quotes)
    }
}

#[async_trait]
impl MarketDataProvider for TerminalProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_indices(&self) -> QuoteMap {
        match self.quotes(INDEX_CODES, &PRICE_FIELDS, AssetClass::Indices).await {
            Some(quotes) => quotes,
            None => self.fallback.fetch_indices().await,
        }
    }

    async fn fetch_fx(&self) -> QuoteMap {
        match self.quotes(FX_CODES, &FX_FIELDS, AssetClass::Fx).await {
            Some(quotes) => quotes,
            None => self.fallback.fetch_fx().await,
        }
    }

    async fn fetch_rates(&self) -> QuoteMap {
        match self.quotes(RATE_CODES, &RATE_FIELDS, AssetClass::Rates).await {
            Some(quotes) => quotes,
            None => self.fallback.fetch_rates().await,
        }
    }

    async fn fetch_commodities(&self) -> QuoteMap {
        let quotes = self
            .quotes(COMMODITY_CODES, &VOLUME_FIELDS, AssetClass::Commodities)
            .await;
        match quotes {
            Some(quotes) => quotes,
            None => self.fallback.fetch_commodities().await,
        }
    }

    async fn fetch_us_stocks(&self) -> QuoteMap {
        match self.quotes(US_STOCK_CODES, &VOLUME_FIELDS, AssetClass::UsStocks).await {
            Some(quotes) => quotes,
            None => self.fallback.fetch_us_stocks().await,
        }
    }

    /// The terminal carries no crypto feed.
    async fn fetch_crypto(&self) -> QuoteMap {
        self.fallback.fetch_crypto().await
    }

    /// The terminal carries no calendar feed; the deterministic events are
    /// served, narrowed to the reporting window when any fall inside it.
    async fn fetch_calendar(&self) -> Vec<CalendarEvent> {
        if !self.ensure_connected().await {
            warn!("Terminal unavailable, serving deterministic calendar");
        }
        let events = self.fallback.fetch_calendar().await;
        let in_window = filter_window(&events, Utc::now());
        if in_window.is_empty() {
            events
        } else {
            in_window
        }
    }

    async fn fetch_a_share_short_term(&self) -> ShortTermBoards {
        self.fallback.fetch_a_share_short_term().await
    }
}
