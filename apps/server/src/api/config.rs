use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use wallboard_core::settings::DataMode;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct RuntimeConfig {
    data_mode: DataMode,
}

#[derive(Deserialize)]
struct ConfigUpdate {
    data_mode: Option<String>,
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<RuntimeConfig> {
    let service = state.snapshot.current().await;
    Json(RuntimeConfig {
        data_mode: service.settings().data_mode,
    })
}

/// Switches the data mode; the provider and snapshot service are rebuilt.
async fn update_config(
    State(state): State<Arc<AppState>>,
    update: Result<Json<ConfigUpdate>, JsonRejection>,
) -> ApiResult<Json<RuntimeConfig>> {
    let raw = match update {
        Ok(Json(update)) => update.data_mode,
        Err(rejection) => {
            tracing::debug!("Rejected config body: {}", rejection.body_text());
            None
        }
    }
    .ok_or_else(|| ApiError::BadRequest("Invalid data_mode".to_string()))?;
    let data_mode: DataMode = raw.parse()?;

    let current = state.snapshot.current().await.settings().data_mode;
    if current == data_mode {
        tracing::debug!("Data mode already {}, nothing to rebuild", data_mode);
    } else {
        state.switch_data_mode(data_mode).await;
    }
    Ok(Json(RuntimeConfig { data_mode }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/config", get(get_config).post(update_config))
}
