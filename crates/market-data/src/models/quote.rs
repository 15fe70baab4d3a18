use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical quote record for one instrument.
///
/// Only ever built by the normalizer, which guarantees `last` and
/// `prev_close` were resolvable and that `change`/`change_pct` are consistent
/// with them when the upstream omitted either.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument code, unique within its asset-class mapping (e.g. "000001.SH")
    pub code: String,

    pub name: String,

    pub display_name: String,

    /// Latest traded/quoted value
    pub last: Decimal,

    pub change: Decimal,

    /// Percentage change against `prev_close`
    pub change_pct: Decimal,

    /// Opening price, `null` when the upstream did not report it
    pub open: Option<Decimal>,

    pub high: Option<Decimal>,

    pub low: Option<Decimal>,

    pub prev_close: Decimal,

    pub volume: Option<Decimal>,

    /// Time of the quote as reported by the source, in UTC
    pub timestamp: DateTime<Utc>,

    /// Provenance tag (TENCENT, STOOQ, YAHOO, MOCK, ...)
    pub source: String,
}

impl Quote {
    /// True when the code follows the Shanghai/Shenzhen suffix convention.
    pub fn is_a_share(&self) -> bool {
        is_a_share_code(&self.code)
    }
}

/// Local-market suffix convention used by summary and heatmap filters.
pub fn is_a_share_code(code: &str) -> bool {
    code.ends_with(".SH") || code.ends_with(".SZ")
}
