//! USD-based exchange rates resolved into cross pairs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use log::{info, warn};
use rust_decimal::Decimal;
use serde_json::Value;

use super::catalog::FxPair;
use crate::fetch::SourceClient;
use crate::models::{AssetClass, QuoteMap};
use crate::normalizer::{decimal_from_json, normalize, QuoteLabel, RawQuote};
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "EXCHANGERATE";

const ENDPOINT: &str = "https://open.er-api.com/v6/latest/USD";

/// Units of each currency per one USD.
pub type UsdRates = HashMap<String, Decimal>;

/// Resolves `base/quote` from USD-based rates.
///
/// `rates` express units per USD, so non-USD crosses go through USD.
pub fn resolve_cross(rates: &UsdRates, base: &str, quote: &str) -> Option<Decimal> {
    let base = base.to_ascii_uppercase();
    let quote = quote.to_ascii_uppercase();
    if base == quote {
        return Some(Decimal::ONE);
    }
    let rate = |ccy: &str| rates.get(ccy).copied().filter(|r| !r.is_zero());
    match (base.as_str(), quote.as_str()) {
        ("USD", q) => rates.get(q).copied(),
        (b, "USD") => Decimal::ONE.checked_div(rate(b)?),
        (b, q) => rate(q)?.checked_div(rate(b)?),
    }
}

pub struct FxRatesSource {
    client: SourceClient,
}

impl FxRatesSource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
        }
    }

    async fn fetch_payload(&self) -> Option<Value> {
        let payload = self.client.get_json(&HttpRequest::get(ENDPOINT)).await?;
        if payload.get("result").and_then(Value::as_str) != Some("success") {
            warn!("{} returned an error payload", SOURCE_ID);
            return None;
        }
        Some(payload)
    }

    /// Quotes for `pairs`. Rates carry no intraday change, so each quote is
    /// flat against itself.
    pub async fn fetch_quotes(&self, pairs: &[FxPair]) -> QuoteMap {
        let Some(payload) = self.fetch_payload().await else {
            return QuoteMap::new();
        };
        let rates: UsdRates = payload
            .get("rates")
            .and_then(Value::as_object)
            .map(|obj| {
                obj.iter()
                    .filter_map(|(ccy, v)| decimal_from_json(v).map(|d| (ccy.clone(), d)))
                    .collect()
            })
            .unwrap_or_default();
        let timestamp = payload
            .get("time_last_update_unix")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        let quotes: QuoteMap = pairs
            .iter()
            .filter_map(|pair| {
                let last = resolve_cross(&rates, pair.base, pair.quote)?;
                let draft = RawQuote {
                    last: Some(last),
                    prev_close: Some(last),
                    change: Some(Decimal::ZERO),
                    change_pct: Some(Decimal::ZERO),
                    timestamp,
                    ..Default::default()
                };
                let label = QuoteLabel::new(pair.code, pair.name, SOURCE_ID);
                normalize(draft, label, AssetClass::Fx.precision()).map(|q| (q.code.clone(), q))
            })
            .collect();

        info!("{} resolved {}/{} pairs", SOURCE_ID, quotes.len(), pairs.len());
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::catalog::FX_PAIRS;
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;

    fn rates() -> UsdRates {
        [("USD", dec!(1)), ("CNY", dec!(7.25)), ("EUR", dec!(0.925)), ("JPY", dec!(150))]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_resolve_cross_directions() {
        let rates = rates();
        assert_eq!(resolve_cross(&rates, "USD", "CNY"), Some(dec!(7.25)));
        assert_eq!(resolve_cross(&rates, "usd", "usd"), Some(Decimal::ONE));
        let eurusd = resolve_cross(&rates, "EUR", "USD").unwrap();
        assert_eq!(eurusd.round_dp(4), dec!(1.0811));
        let eurjpy = resolve_cross(&rates, "EUR", "JPY").unwrap();
        assert_eq!(eurjpy.round_dp(2), dec!(162.16));
        assert!(resolve_cross(&rates, "GBP", "USD").is_none());
        assert!(resolve_cross(&rates, "USD", "GBP").is_none());
    }

    #[tokio::test]
    async fn test_quotes_from_payload() {
        let body = r#"{"result":"success","time_last_update_unix":1741305601,
            "rates":{"USD":1,"CNY":7.2468,"CNH":7.2501,"EUR":0.9251,"JPY":147.9,"HKD":7.7712,"GBP":0.7761}}"#;
        let transport = Arc::new(ScriptedTransport::new().ok("open.er-api.com", body));
        let source = FxRatesSource::new(transport);

        let quotes = source.fetch_quotes(FX_PAIRS).await;
        assert_eq!(quotes.len(), FX_PAIRS.len());
        let usdcny = &quotes["USDCNY.EX"];
        assert_eq!(usdcny.last, dec!(7.2468));
        assert_eq!(usdcny.prev_close, usdcny.last);
        assert_eq!(usdcny.change, Decimal::ZERO);
        assert_eq!(usdcny.timestamp.timestamp(), 1741305601);
        assert_eq!(quotes["EURUSD.FX"].last, dec!(1.0810));
    }

    #[tokio::test]
    async fn test_error_payload_yields_nothing() {
        let transport = Arc::new(
            ScriptedTransport::new().ok("open.er-api.com", r#"{"result":"error","error-type":"quota"}"#),
        );
        let source = FxRatesSource::new(transport);
        assert!(source.fetch_quotes(FX_PAIRS).await.is_empty());
    }
}
