use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use wallboard_core::settings::DataMode;

use crate::main_lib::AppState;

#[derive(Serialize)]
struct Live {
    status: &'static str,
}

#[derive(Serialize)]
struct Ready {
    status: &'static str,
    data_mode: DataMode,
    cache_enabled: bool,
}

async fn live() -> Json<Live> {
    Json(Live { status: "ok" })
}

/// Readiness along with the mode currently serving snapshots.
async fn ready(State(state): State<Arc<AppState>>) -> Json<Ready> {
    let service = state.snapshot.current().await;
    Json(Ready {
        status: "ok",
        data_mode: service.settings().data_mode,
        cache_enabled: service.cache_enabled(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
}
