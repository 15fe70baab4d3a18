use std::sync::Arc;

use log::info;
use wallboard_market_data::{
    AggregatedProvider, DeterministicProvider, HttpTransport, MarketDataProvider, TerminalProvider,
};

use super::snapshot_service::SnapshotService;
use crate::cache::MemoryCache;
use crate::settings::{DataMode, Settings};

/// Provider backing `mode`.
///
/// No terminal session is linked into this build, so `Wind` runs the
/// terminal provider in its degraded form, serving deterministic data.
pub fn build_provider(
    mode: DataMode,
    transport: Arc<dyn HttpTransport>,
) -> Arc<dyn MarketDataProvider> {
    match mode {
        DataMode::Wind => {
            info!("Creating terminal provider (no session available, degrading to mock data)");
            Arc::new(TerminalProvider::unavailable())
        }
        DataMode::Open => {
            info!("Using open provider over public upstream sources");
            Arc::new(AggregatedProvider::new(transport))
        }
        DataMode::Mock => {
            info!("Using mock provider for local development");
            Arc::new(DeterministicProvider::new())
        }
    }
}

/// Snapshot service for `settings`, with an in-memory cache when enabled.
pub fn build_snapshot_service(
    settings: Settings,
    transport: Arc<dyn HttpTransport>,
) -> SnapshotService {
    let provider = build_provider(settings.data_mode, transport);
    let cache_enabled = settings.cache_enabled;
    let service = SnapshotService::new(provider, settings);
    if cache_enabled {
        service.with_cache(Arc::new(MemoryCache::new()))
    } else {
        service
    }
}
