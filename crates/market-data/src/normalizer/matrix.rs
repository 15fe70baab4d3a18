//! Terminal field matrices: one value series per requested field, each
//! series indexed like the requested code list.

use rust_decimal::Decimal;

use super::parse::decimal_from_f64;
use super::raw::RawQuote;

/// Field-major result of a terminal query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMatrix {
    pub fields: Vec<String>,
    pub data: Vec<Vec<Option<f64>>>,
}

impl FieldMatrix {
    pub fn new(fields: &[&str], data: Vec<Vec<Option<f64>>>) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            data,
        }
    }

    /// True when every cell is zero or missing.
    ///
    /// Terminals answer with all zeros when the realtime entitlement is
    /// missing or the market is closed.
    pub fn is_all_zero(&self) -> bool {
        self.data
            .iter()
            .flatten()
            .all(|cell| cell.map_or(true, |v| v == 0.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Last,
    Change,
    ChangePct,
    Open,
    High,
    Low,
    PrevClose,
    Volume,
}

/// Realtime (`rt_*`) and snapshot field names mapped onto quote slots.
fn slot_for(field: &str) -> Option<Slot> {
    let slot = match field.trim().to_ascii_lowercase().as_str() {
        "rt_last" | "close" => Slot::Last,
        "rt_chg" | "chg" => Slot::Change,
        "rt_pct_chg" | "pct_chg" => Slot::ChangePct,
        "rt_open" | "open" => Slot::Open,
        "rt_high" | "high" => Slot::High,
        "rt_low" | "low" => Slot::Low,
        "rt_pre_close" | "pre_close" => Slot::PrevClose,
        "rt_vol" | "volume" => Slot::Volume,
        _ => return None,
    };
    Some(slot)
}

/// Turns a matrix into per-code drafts, in request order.
///
/// NaN and missing cells are skipped. When no previous close is reported it
/// is recovered from `last - change`.
pub fn matrix_to_raw(codes: &[&str], matrix: &FieldMatrix) -> Vec<(String, RawQuote)> {
    codes
        .iter()
        .enumerate()
        .map(|(idx, code)| {
            let mut raw = RawQuote::default();
            for (field, series) in matrix.fields.iter().zip(&matrix.data) {
                let Some(slot) = slot_for(field) else {
                    continue;
                };
                let Some(value) = series.get(idx).copied().flatten().and_then(decimal_from_f64)
                else {
                    continue;
                };
                assign(&mut raw, slot, value);
            }
            (code.to_string(), raw.with_prev_close_from_change())
        })
        .collect()
}

fn assign(raw: &mut RawQuote, slot: Slot, value: Decimal) {
    let target = match slot {
        Slot::Last => &mut raw.last,
        Slot::Change => &mut raw.change,
        Slot::ChangePct => &mut raw.change_pct,
        Slot::Open => &mut raw.open,
        Slot::High => &mut raw.high,
        Slot::Low => &mut raw.low,
        Slot::PrevClose => &mut raw.prev_close,
        Slot::Volume => &mut raw.volume,
    };
    *target = Some(value);
}
