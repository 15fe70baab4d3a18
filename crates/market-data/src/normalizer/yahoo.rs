//! Yahoo chart endpoint (`/v8/finance/chart/{symbol}`), `chart.result[0].meta`.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use super::parse::decimal_from_f64;
use super::raw::RawQuote;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    regular_market_open: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_volume: Option<f64>,
    regular_market_time: Option<i64>,
}

/// Extracts a draft from a chart response.
///
/// `previousClose` is preferred over `chartPreviousClose`. Returns `None`
/// when the payload has no result.
pub fn parse_chart(payload: &Value) -> Option<RawQuote> {
    let response: ChartResponse = serde_json::from_value(payload.clone()).ok()?;
    let meta = response.chart.result?.into_iter().next()?.meta;

    Some(RawQuote {
        last: meta.regular_market_price.and_then(decimal_from_f64),
        prev_close: meta
            .previous_close
            .or(meta.chart_previous_close)
            .and_then(decimal_from_f64),
        open: meta.regular_market_open.and_then(decimal_from_f64),
        high: meta.regular_market_day_high.and_then(decimal_from_f64),
        low: meta.regular_market_day_low.and_then(decimal_from_f64),
        volume: meta.regular_market_volume.and_then(decimal_from_f64),
        change: None,
        change_pct: None,
        timestamp: meta
            .regular_market_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}
