//! Upstream symbol tables: which upstream symbol feeds which canonical code.

/// One upstream symbol and the canonical instrument it maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Listing {
    /// Symbol as the upstream knows it
    pub symbol: &'static str,
    /// Canonical code used in snapshots
    pub code: &'static str,
    pub name: &'static str,
}

const fn listing(symbol: &'static str, code: &'static str, name: &'static str) -> Listing {
    Listing { symbol, code, name }
}

pub const TENCENT_A_SHARE_INDICES: &[Listing] = &[
    listing("sh000001", "000001.SH", "上证综指"),
    listing("sz399001", "399001.SZ", "深证成指"),
    listing("sz399006", "399006.SZ", "创业板指"),
    listing("sh000300", "000300.SH", "沪深300"),
    listing("sh000905", "000905.SH", "中证500"),
    listing("sh000852", "000852.SH", "中证1000"),
    listing("sh000016", "000016.SH", "上证50"),
];

pub const TENCENT_GLOBAL_INDICES: &[Listing] = &[
    listing("hkHSI", "HSI.HI", "恒生指数"),
    listing("hkHSCEI", "HSCEI.HI", "恒生中国企业"),
    listing("usDJI", "DJI.GI", "道琼斯"),
    listing("usINX", "SPX.GI", "标普500"),
    listing("usIXIC", "IXIC.GI", "纳斯达克"),
    listing("usNDX", "NDXTMC.GI", "纳指100"),
];

pub const TENCENT_US_STOCKS: &[Listing] = &[
    listing("usAAPL", "AAPL.O", "苹果"),
    listing("usMSFT", "MSFT.O", "微软"),
    listing("usGOOGL", "GOOGL.O", "谷歌"),
    listing("usTSLA", "TSLA.O", "特斯拉"),
    listing("usAMZN", "AMZN.O", "亚马逊"),
    listing("usMETA", "META.O", "Meta"),
    listing("usNVDA", "NVDA.O", "英伟达"),
];

pub const TENCENT_FUTURES: &[Listing] = &[
    listing("hf_CL", "CL.NYM", "WTI 原油"),
    listing("hf_GC", "GC.CMX", "COMEX 黄金"),
    listing("hf_SI", "SI.CMX", "COMEX 白银"),
    listing("hf_HG", "HG.CMX", "COMEX 铜"),
    listing("hf_NG", "NG.NYM", "NYMEX 天然气"),
];

pub const STOOQ_INDICES: &[Listing] = &[
    listing("^SPX", "SPX.GI", "标普500"),
    listing("^DJI", "DJI.GI", "道琼斯"),
    listing("^IXIC", "IXIC.GI", "纳斯达克"),
    listing("^HSI", "HSI.HI", "恒生指数"),
    listing("^N225", "N225.GI", "日经225"),
    listing("000001.SS", "000001.SH", "上证综指"),
    listing("399001.SZ", "399001.SZ", "深证成指"),
    listing("399006.SZ", "399006.SZ", "创业板指"),
    listing("000300.SS", "000300.SH", "沪深300"),
    listing("000852.SS", "000852.SH", "中证1000"),
    listing("000016.SS", "000016.SH", "上证50"),
    listing("000905.SS", "000905.SH", "中证500"),
    listing("^STOXX50E", "SX5E.GI", "欧元区50"),
    listing("^FTSE", "UKX.GI", "富时100"),
    listing("^FCHI", "CAC.GI", "法国CAC40"),
    listing("^GDAXI", "DAX.GI", "德国DAX"),
];

pub const STOOQ_US_STOCKS: &[Listing] = &[
    listing("AAPL.US", "AAPL.O", "苹果"),
    listing("MSFT.US", "MSFT.O", "微软"),
    listing("GOOGL.US", "GOOGL.O", "谷歌"),
    listing("TSLA.US", "TSLA.O", "特斯拉"),
    listing("AMZN.US", "AMZN.O", "亚马逊"),
    listing("^SPX", "SPX.GI", "标普500"),
    listing("^DJI", "DJI.GI", "道琼斯"),
    listing("^IXIC", "IXIC.GI", "纳斯达克"),
];

pub const YAHOO_COMMODITIES: &[Listing] = &[
    listing("CL=F", "CL.NYM", "WTI 原油"),
    listing("BZ=F", "COIL.BR", "布伦特原油"),
    listing("NG=F", "NG.NYM", "NYMEX 天然气"),
    listing("HG=F", "HG.CMX", "COMEX 铜"),
    listing("GC=F", "GC.CMX", "COMEX 黄金"),
    listing("SI=F", "SI.CMX", "COMEX 白银"),
    listing("PL=F", "PL.NYM", "NYMEX 铂金"),
    listing("PA=F", "PA.NYM", "NYMEX 钯金"),
    listing("ZC=F", "ZC.CBT", "CBOT 玉米"),
    listing("ZS=F", "ZS.CBT", "CBOT 大豆"),
    listing("KC=F", "KC.NYB", "ICE 咖啡"),
];

pub const YAHOO_RATES: &[Listing] = &[
    listing("^TNX", "UST10Y.GBM", "美债10Y"),
    listing("^FVX", "UST5Y.GBM", "美债5Y"),
    listing("^IRX", "UST3M.GBM", "美债3M"),
];

/// FRED series ids, with the series id as `symbol`.
pub const FRED_RATES: &[Listing] = &[
    listing("DGS10", "UST10Y.GBM", "美债10Y"),
    listing("DGS2", "UST2Y.GBM", "美债2Y"),
    listing("SOFR", "SOFR.IR", "SOFR隔夜融资"),
    listing("IUDSOIA", "SONIA.IR", "SONIA(英镑)"),
    listing("EFFR", "EFFR.IR", "联邦基金有效利率"),
];

/// China government bond tenors, keyed by normalized maturity label.
pub const CHINABOND_TENORS: &[Listing] = &[
    listing("1Y", "M0000001.SH", "中国国债1Y"),
    listing("3Y", "M0000007.SH", "中国国债3Y"),
    listing("5Y", "M0000025.SH", "中国国债5Y"),
    listing("10Y", "M0000017.SH", "中国国债10Y"),
];

/// CoinGecko coin ids.
pub const COINGECKO_COINS: &[Listing] = &[
    listing("bitcoin", "BTC.CC", "比特币"),
    listing("ethereum", "ETH.CC", "以太坊"),
    listing("solana", "SOL.CC", "Solana"),
    listing("binancecoin", "BNB.CC", "BNB"),
    listing("ripple", "XRP.CC", "XRP"),
];

/// A currency pair resolved from USD-based rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FxPair {
    pub base: &'static str,
    pub quote: &'static str,
    pub code: &'static str,
    pub name: &'static str,
}

pub const FX_PAIRS: &[FxPair] = &[
    FxPair { base: "USD", quote: "CNY", code: "USDCNY.EX", name: "USD/CNY" },
    FxPair { base: "USD", quote: "CNH", code: "USDCNH.FX", name: "USD/CNH" },
    FxPair { base: "EUR", quote: "USD", code: "EURUSD.FX", name: "EUR/USD" },
    FxPair { base: "USD", quote: "JPY", code: "USDJPY.FX", name: "USD/JPY" },
    FxPair { base: "USD", quote: "HKD", code: "USDHKD.FX", name: "USD/HKD" },
    FxPair { base: "GBP", quote: "USD", code: "GBPUSD.FX", name: "GBP/USD" },
];

/// Listings whose code is not yet present in `have`.
pub fn missing_from<F>(listings: &[Listing], have: F) -> Vec<Listing>
where
    F: Fn(&str) -> bool,
{
    listings
        .iter()
        .filter(|listing| !have(listing.code))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_unique_within_each_table() {
        for table in [
            TENCENT_A_SHARE_INDICES,
            TENCENT_GLOBAL_INDICES,
            TENCENT_US_STOCKS,
            STOOQ_INDICES,
            YAHOO_COMMODITIES,
            FRED_RATES,
        ] {
            let codes: HashSet<_> = table.iter().map(|l| l.code).collect();
            assert_eq!(codes.len(), table.len());
        }
    }

    #[test]
    fn test_missing_from() {
        let missing = missing_from(STOOQ_US_STOCKS, |code| code.ends_with(".O"));
        let codes: Vec<_> = missing.iter().map(|l| l.code).collect();
        assert_eq!(codes, vec!["SPX.GI", "DJI.GI", "IXIC.GI"]);
    }
}
