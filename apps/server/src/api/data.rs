use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use wallboard_core::Snapshot;

use crate::main_lib::AppState;

async fn snapshot(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    let service = state.snapshot.current().await;
    Json(service.get_snapshot().await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/data/snapshot", get(snapshot))
}
