use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Quote, PCT_PRECISION};

/// Source-agnostic draft of a quote, as pulled out of an upstream payload.
///
/// Every field is optional; [`normalize`] decides whether the draft is
/// complete enough to become a [`Quote`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawQuote {
    pub last: Option<Decimal>,
    pub change: Option<Decimal>,
    pub change_pct: Option<Decimal>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub prev_close: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawQuote {
    /// Fills `prev_close` from `last - change` when only the change is known.
    ///
    /// Left unset when the subtraction overflows.
    pub fn with_prev_close_from_change(mut self) -> Self {
        if self.prev_close.is_none() {
            if let (Some(last), Some(change)) = (self.last, self.change) {
                self.prev_close = last.checked_sub(change);
            }
        }
        self
    }
}

/// Identity attached to a normalized quote.
#[derive(Clone, Copy, Debug)]
pub struct QuoteLabel<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub source: &'a str,
}

impl<'a> QuoteLabel<'a> {
    pub fn new(code: &'a str, name: &'a str, source: &'a str) -> Self {
        Self { code, name, source }
    }
}

/// Turns a draft into a canonical quote, or `None` if `last` or
/// `prev_close` is missing or their difference overflows.
///
/// `change` and `change_pct` are derived when absent; a zero `prev_close`
/// yields a zero percentage. Price fields are rounded to `precision`,
/// `change_pct` always to two places.
pub fn normalize(raw: RawQuote, label: QuoteLabel<'_>, precision: u32) -> Option<Quote> {
    let last = raw.last?;
    let prev_close = raw.prev_close?;

    let change = match raw.change {
        Some(change) => change,
        None => last.checked_sub(prev_close)?,
    };
    let change_pct = raw
        .change_pct
        .unwrap_or_else(|| percent_change(change, prev_close));

    let round = |value: Decimal| value.round_dp(precision);

    Some(Quote {
        code: label.code.to_string(),
        name: label.name.to_string(),
        display_name: label.name.to_string(),
        last: round(last),
        change: round(change),
        change_pct: change_pct.round_dp(PCT_PRECISION),
        open: raw.open.map(round),
        high: raw.high.map(round),
        low: raw.low.map(round),
        prev_close: round(prev_close),
        volume: raw.volume,
        timestamp: raw.timestamp.unwrap_or_else(Utc::now),
        source: label.source.to_string(),
    })
}

/// `change / reference * 100`, zero when the reference is zero or the
/// division overflows.
pub fn percent_change(change: Decimal, reference: Decimal) -> Decimal {
    if reference.is_zero() {
        return Decimal::ZERO;
    }
    change
        .checked_div(reference)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn label() -> QuoteLabel<'static> {
        QuoteLabel::new("000001.SH", "上证综指", "TENCENT")
    }

    #[test]
    fn test_requires_last_and_prev_close() {
        let raw = RawQuote {
            last: Some(dec!(10)),
            ..Default::default()
        };
        assert!(normalize(raw, label(), 2).is_none());

        let raw = RawQuote {
            prev_close: Some(dec!(10)),
            ..Default::default()
        };
        assert!(normalize(raw, label(), 2).is_none());
    }

    #[test]
    fn test_derives_change_and_pct() {
        let raw = RawQuote {
            last: Some(dec!(3150.2)),
            prev_close: Some(dec!(3162.5)),
            ..Default::default()
        };
        let quote = normalize(raw, label(), 2).unwrap();
        assert_eq!(quote.change, dec!(-12.30));
        assert_eq!(quote.change_pct, dec!(-0.39));
        assert_eq!(quote.source, "TENCENT");
        assert_eq!(quote.display_name, "上证综指");
    }

    #[test]
    fn test_keeps_upstream_change_fields() {
        let raw = RawQuote {
            last: Some(dec!(100)),
            prev_close: Some(dec!(90)),
            change: Some(dec!(9.5)),
            change_pct: Some(dec!(10.555)),
            ..Default::default()
        };
        let quote = normalize(raw, label(), 2).unwrap();
        assert_eq!(quote.change, dec!(9.5));
        assert_eq!(quote.change_pct, dec!(10.56));
    }

    #[test]
    fn test_zero_prev_close_gives_zero_pct() {
        let raw = RawQuote {
            last: Some(dec!(5)),
            prev_close: Some(Decimal::ZERO),
            ..Default::default()
        };
        let quote = normalize(raw, label(), 2).unwrap();
        assert_eq!(quote.change, dec!(5));
        assert_eq!(quote.change_pct, Decimal::ZERO);
    }

    #[test]
    fn test_precision_applies_to_prices_not_pct() {
        let raw = RawQuote {
            last: Some(dec!(7.112345)),
            prev_close: Some(dec!(7.116789)),
            high: Some(dec!(7.2222222)),
            ..Default::default()
        };
        let quote = normalize(raw, QuoteLabel::new("USDCNH.FX", "USD/CNH", "FX"), 4).unwrap();
        assert_eq!(quote.last, dec!(7.1123));
        assert_eq!(quote.high, Some(dec!(7.2222)));
        assert_eq!(quote.change_pct.scale(), 2);
        assert!(quote.open.is_none());
        assert!(quote.volume.is_none());
    }

    #[test]
    fn test_prev_close_from_change() {
        let raw = RawQuote {
            last: Some(dec!(2.69)),
            change: Some(dec!(-0.01)),
            ..Default::default()
        }
        .with_prev_close_from_change();
        assert_eq!(raw.prev_close, Some(dec!(2.70)));
    }

    #[test]
    fn test_overflowing_difference_is_dropped() {
        let raw = RawQuote {
            last: Some(Decimal::MAX),
            prev_close: Some(Decimal::MIN),
            ..Default::default()
        };
        assert!(normalize(raw, label(), 2).is_none());

        let raw = RawQuote {
            last: Some(Decimal::MAX),
            change: Some(Decimal::MIN),
            ..Default::default()
        }
        .with_prev_close_from_change();
        assert!(raw.prev_close.is_none());
        assert!(normalize(raw, label(), 2).is_none());
    }
}
