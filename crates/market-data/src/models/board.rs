use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One A-share sector/concept board row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub code: String,
    pub name: String,
    pub display_name: String,
    pub change_pct: Option<Decimal>,
    /// Main-force net inflow, in units of 1e8 CNY
    pub net_flow: Option<Decimal>,
    pub turnover_rate: Option<Decimal>,
}

/// Short-term A-share board rankings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortTermBoards {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub hot_boards: Vec<BoardEntry>,
    pub cold_boards: Vec<BoardEntry>,
    pub capital_boards: Vec<BoardEntry>,
}

impl ShortTermBoards {
    /// Ranks boards into hot/cold/capital lists of at most `limit` entries.
    ///
    /// Boards without a `change_pct` rank as flat. The capital list falls
    /// back to the hot list when no board reports a net flow.
    pub fn rank(
        boards: &[BoardEntry],
        limit: usize,
        source: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let pct = |entry: &BoardEntry| entry.change_pct.unwrap_or(Decimal::ZERO);

        let mut hot = boards.to_vec();
        hot.sort_by(|a, b| pct(b).cmp(&pct(a)));
        hot.truncate(limit);

        let mut cold = boards.to_vec();
        cold.sort_by(|a, b| pct(a).cmp(&pct(b)));
        cold.truncate(limit);

        let mut capital: Vec<BoardEntry> = boards
            .iter()
            .filter(|entry| entry.net_flow.is_some())
            .cloned()
            .collect();
        capital.sort_by(|a, b| b.net_flow.cmp(&a.net_flow));
        capital.truncate(limit);
        if capital.is_empty() {
            capital = hot.clone();
        }

        Self {
            timestamp,
            source: source.to_string(),
            hot_boards: hot,
            cold_boards: cold,
            capital_boards: capital,
        }
    }

    /// Rankings with no boards at all.
    pub fn empty(source: &str) -> Self {
        Self::rank(&[], 0, source, Utc::now())
    }

    pub fn is_empty(&self) -> bool {
        self.hot_boards.is_empty() && self.cold_boards.is_empty()
    }
}
