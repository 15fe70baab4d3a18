//! Eastmoney sector board list for the A-share short-term view.

use std::sync::Arc;

use log::info;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::fetch::SourceClient;
use crate::models::BoardEntry;
use crate::normalizer::decimal_from_json;
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "EASTMONEY";

const ENDPOINT: &str = "https://push2.eastmoney.com/api/qt/clist/get";
const FIELDS: &str = "f12,f14,f3,f62,f184,f204,f205";
const PAGE_SIZE: u32 = 60;
const FLOW_DIVISOR: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Parses one `data.diff[]` row: `f12` code, `f14` name, `f3` change %,
/// `f62` main-force net inflow, `f184`/`f204`/`f205` turnover.
pub fn parse_board_row(row: &Value) -> Option<BoardEntry> {
    let text = |key: &str| {
        row.get(key)
            .and_then(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
    };
    let number = |key: &str| row.get(key).and_then(decimal_from_json);

    let code = text("f12")?;
    let name = text("f14")?;
    let turnover = ["f184", "f204", "f205"]
        .iter()
        .find_map(|key| number(key).filter(|v| !v.is_zero()));

    Some(BoardEntry {
        code,
        display_name: name.clone(),
        name,
        change_pct: number("f3").map(|v| v.round_dp(2)),
        net_flow: number("f62").map(|v| (v / FLOW_DIVISOR).round_dp(2)),
        turnover_rate: turnover.map(|v| v.round_dp(2)),
    })
}

pub struct EastmoneySource {
    client: SourceClient,
}

impl EastmoneySource {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new(SOURCE_ID, transport),
        }
    }

    /// Board rows; tried directly, then through the reader proxy.
    pub async fn fetch_boards(&self) -> Vec<BoardEntry> {
        let request = HttpRequest::get(ENDPOINT)
            .query("pn", 1)
            .query("pz", PAGE_SIZE)
            .query("po", 1)
            .query("np", 1)
            .query("ut", "b2884a393a59ad64002292a3e90d46a5")
            .query("fltt", 2)
            .query("invt", 2)
            .query("fid", "f3")
            .query("fs", "m:90+t:2")
            .query("fields", FIELDS)
            .header("Referer", "https://quote.eastmoney.com");

        let Some(payload) = self.client.get_json_or_proxy(&request).await else {
            return Vec::new();
        };
        let boards: Vec<BoardEntry> = payload
            .pointer("/data/diff")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().filter_map(parse_board_row).collect())
            .unwrap_or_default();

        info!("{} returned {} boards", SOURCE_ID, boards.len());
        boards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_board_row() {
        let row = json!({"f12": "BK0470", "f14": "半导体", "f3": 2.816, "f62": 125000.0, "f184": "-", "f204": 3.456});
        let entry = parse_board_row(&row).unwrap();
        assert_eq!(entry.code, "BK0470");
        assert_eq!(entry.display_name, "半导体");
        assert_eq!(entry.change_pct, Some(dec!(2.82)));
        assert_eq!(entry.net_flow, Some(dec!(12.50)));
        assert_eq!(entry.turnover_rate, Some(dec!(3.46)));
    }

    #[test]
    fn test_rows_without_identity_are_dropped() {
        assert!(parse_board_row(&json!({"f14": "半导体"})).is_none());
        assert!(parse_board_row(&json!({"f12": "BK0470", "f14": ""})).is_none());
        let sparse = parse_board_row(&json!({"f12": "BK0470", "f14": "半导体", "f3": "-"})).unwrap();
        assert!(sparse.change_pct.is_none());
        assert!(sparse.net_flow.is_none());
    }

    #[tokio::test]
    async fn test_fetch_boards_falls_back_to_proxy() {
        let body = r#"{"rc":0,"data":{"total":2,"diff":[
            {"f12":"BK0470","f14":"半导体","f3":2.8,"f62":125000},
            {"f12":"BK0491","f14":"光伏","f3":-1.4,"f62":-38000}]}}"#;
        let transport = Arc::new(
            ScriptedTransport::new()
                .ok("r.jina.ai", body)
                .status("push2.eastmoney.com", 403),
        );
        let source = EastmoneySource::new(transport.clone());

        let boards = source.fetch_boards().await;
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[1].net_flow, Some(dec!(-3.80)));
        assert_eq!(transport.calls("r.jina.ai"), 1);
        let direct = &transport.requests()[0];
        assert!(direct.headers.iter().any(|(k, _)| k == "Referer"));
    }
}
