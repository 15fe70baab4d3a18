//! Loan prime rate.
//!
//! There is no stable open feed for the LPR, so this source contributes
//! nothing and the rate comes from the deterministic dataset when every
//! other rates source is empty.

use log::debug;

use crate::models::QuoteMap;

pub const SOURCE_ID: &str = "LPR";

#[derive(Debug, Default)]
pub struct LprSource;

impl LprSource {
    pub async fn fetch_quotes(&self) -> QuoteMap {
        debug!("{} has no open feed, skipping", SOURCE_ID);
        QuoteMap::new()
    }
}
