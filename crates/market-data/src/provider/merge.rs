use crate::models::QuoteMap;

/// Folds `incoming` into `base`, keeping whichever quote is newer.
///
/// An incoming quote replaces the base entry only when it is strictly newer;
/// on a tie the base wins. Codes present on only one side pass through.
pub fn merge_by_recency(mut base: QuoteMap, incoming: QuoteMap) -> QuoteMap {
    for (code, quote) in incoming {
        match base.get(&code) {
            Some(existing) if existing.timestamp >= quote.timestamp => {}
            _ => {
                base.insert(code, quote);
            }
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn quote(code: &str, source: &str, timestamp: DateTime<Utc>) -> Quote {
        Quote {
            code: code.to_string(),
            name: code.to_string(),
            display_name: code.to_string(),
            last: dec!(2.5),
            change: dec!(0),
            change_pct: dec!(0),
            open: None,
            high: None,
            low: None,
            prev_close: dec!(2.5),
            volume: None,
            timestamp,
            source: source.to_string(),
        }
    }

    fn map(quotes: Vec<Quote>) -> QuoteMap {
        quotes.into_iter().map(|q| (q.code.clone(), q)).collect()
    }

    #[test]
    fn test_newer_incoming_replaces_base() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 7, 8, 0, 0).unwrap();
        let base = map(vec![quote("UST10Y.GBM", "YAHOO", t0)]);
        let incoming = map(vec![quote("UST10Y.GBM", "FRED", t0 + Duration::minutes(1))]);

        let merged = merge_by_recency(base, incoming);
        assert_eq!(merged["UST10Y.GBM"].source, "FRED");
    }

    #[test]
    fn test_tie_and_older_keep_base() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 7, 8, 0, 0).unwrap();
        let base = map(vec![
            quote("UST10Y.GBM", "YAHOO", t0),
            quote("UST2Y.GBM", "YAHOO", t0),
        ]);
        let incoming = map(vec![
            quote("UST10Y.GBM", "FRED", t0),
            quote("UST2Y.GBM", "FRED", t0 - Duration::days(1)),
        ]);

        let merged = merge_by_recency(base, incoming);
        assert_eq!(merged["UST10Y.GBM"].source, "YAHOO");
        assert_eq!(merged["UST2Y.GBM"].source, "YAHOO");
    }

    #[test]
    fn test_disjoint_codes_pass_through() {
        let t0 = Utc::now();
        let base = map(vec![quote("M0000017.SH", "CHINABOND", t0)]);
        let incoming = map(vec![quote("SOFR.IR", "FRED", t0)]);

        let merged = merge_by_recency(base, incoming);
        assert_eq!(merged.len(), 2);
    }
}
