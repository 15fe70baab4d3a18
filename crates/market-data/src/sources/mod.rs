//! Per-source fetchers.
//!
//! Each fetcher owns its [`SourceClient`](crate::fetch::SourceClient) and
//! short-lived cache, never raises, and returns a (possibly empty) mapping of
//! canonical quotes.
//!
//! | Source | Cache TTL | Used for |
//! |---|---|---|
//! | [`TencentSource`] | 5 s | indices, US stocks, futures |
//! | [`StooqSource`] | 15 s | indices/US stocks other feeds missed |
//! | [`FxRatesSource`] | - | FX via cross rates |
//! | [`YahooChartSource`] | 30 s | commodities, UST yields |
//! | [`ChinaBondSource`] | 600 s | CGB yields |
//! | [`FredSource`] | 300 s | US rates series |
//! | [`LprSource`] | - | loan prime rate (no open feed) |
//! | [`CoinGeckoSource`] | 60 s | crypto |
//! | [`EastmoneySource`] | - | A-share board rankings |

pub mod catalog;
pub mod chinabond;
pub mod coingecko;
pub mod eastmoney;
pub mod fred;
pub mod fx_rates;
pub mod lpr;
pub mod stooq;
pub mod tencent;
pub mod yahoo_chart;

pub use catalog::{FxPair, Listing};
pub use chinabond::ChinaBondSource;
pub use coingecko::CoinGeckoSource;
pub use eastmoney::EastmoneySource;
pub use fred::FredSource;
pub use fx_rates::FxRatesSource;
pub use lpr::LprSource;
pub use stooq::StooqSource;
pub use tencent::TencentSource;
pub use yahoo_chart::YahooChartSource;
