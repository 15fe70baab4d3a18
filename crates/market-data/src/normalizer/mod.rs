//! Quote normalization.
//!
//! Pure functions that turn heterogeneous upstream payloads into canonical
//! [`Quote`](crate::models::Quote) records:
//! - [`parse`] - total numeric and timestamp parsing
//! - [`RawQuote`] and [`normalize`] - derivation, validation and rounding
//! - [`tencent`], [`stooq`], [`yahoo`], [`matrix`] - per-shape extractors

pub mod matrix;
pub mod parse;
mod raw;
pub mod stooq;
pub mod tencent;
pub mod yahoo;

pub use matrix::FieldMatrix;
pub use parse::{decimal_from_f64, decimal_from_json, parse_decimal, parse_timestamp, try_parse_timestamp};
pub use raw::{normalize, percent_change, QuoteLabel, RawQuote};
