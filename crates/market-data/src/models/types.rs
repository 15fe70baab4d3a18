use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::quote::Quote;

/// Mapping from instrument code to its canonical quote for one asset class.
///
/// A `BTreeMap` keeps serialized snapshots stable across cycles.
pub type QuoteMap = BTreeMap<String, Quote>;

/// Source identifier attached to quotes and log lines (e.g. "TENCENT").
pub type SourceId = &'static str;

/// The asset classes a snapshot is assembled from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Indices,
    Fx,
    Rates,
    Commodities,
    UsStocks,
    Crypto,
    Calendar,
    AShareShortTerm,
}

impl AssetClass {
    /// Every asset class, in snapshot order.
    pub const ALL: [AssetClass; 8] = [
        AssetClass::Indices,
        AssetClass::Fx,
        AssetClass::Rates,
        AssetClass::Commodities,
        AssetClass::UsStocks,
        AssetClass::Crypto,
        AssetClass::Calendar,
        AssetClass::AShareShortTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indices => "indices",
            Self::Fx => "fx",
            Self::Rates => "rates",
            Self::Commodities => "commodities",
            Self::UsStocks => "us_stocks",
            Self::Crypto => "crypto",
            Self::Calendar => "calendar",
            Self::AShareShortTerm => "a_share_short_term",
        }
    }

    /// Decimal places used for price-like fields of this class.
    ///
    /// `change_pct` is always rounded to [`PCT_PRECISION`] regardless.
    pub fn precision(&self) -> u32 {
        match self {
            Self::Fx => 4,
            Self::Rates => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decimal places for percentage changes.
pub const PCT_PRECISION: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_per_class() {
        assert_eq!(AssetClass::Indices.precision(), 2);
        assert_eq!(AssetClass::Commodities.precision(), 2);
        assert_eq!(AssetClass::Fx.precision(), 4);
        assert_eq!(AssetClass::Rates.precision(), 3);
    }

    #[test]
    fn test_serde_names_match_snapshot_keys() {
        for class in AssetClass::ALL {
            let json = serde_json::to_string(&class).unwrap();
            assert_eq!(json, format!("\"{}\"", class.as_str()));
        }
    }
}
