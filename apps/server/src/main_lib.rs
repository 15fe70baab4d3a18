use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wallboard_core::settings::{DataMode, Settings};
use wallboard_core::snapshot::{build_snapshot_service, SharedSnapshotService};
use wallboard_market_data::{HttpTransport, ReqwestTransport};

use crate::config::Config;

pub struct AppState {
    pub snapshot: Arc<SharedSnapshotService>,
    pub transport: Arc<dyn HttpTransport>,
    /// Settings the server started with; mode switches derive from these.
    pub settings: Settings,
}

impl AppState {
    /// Rebuilds provider and snapshot service for `data_mode`.
    pub async fn switch_data_mode(&self, data_mode: DataMode) {
        let settings = self.settings.with_data_mode(data_mode);
        let service = build_snapshot_service(settings, self.transport.clone());
        self.snapshot.replace(service).await;
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("WALLBOARD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let settings = config.settings()?;
    tracing::info!(
        "Data mode: {} (snapshot cache {}, ttl {:?})",
        settings.data_mode,
        if settings.cache_enabled { "enabled" } else { "disabled" },
        settings.snapshot_cache_ttl
    );

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::default());
    let service = build_snapshot_service(settings.clone(), transport.clone());

    Ok(Arc::new(AppState {
        snapshot: Arc::new(SharedSnapshotService::new(service)),
        transport,
        settings,
    }))
}
