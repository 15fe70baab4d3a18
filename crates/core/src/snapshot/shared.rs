use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use super::snapshot_service::SnapshotService;

/// The currently active [`SnapshotService`], swappable at runtime.
///
/// Readers clone the inner `Arc`, so a swap never waits for an in-flight
/// snapshot; that snapshot simply completes against the old provider.
pub struct SharedSnapshotService {
    inner: RwLock<Arc<SnapshotService>>,
}

impl SharedSnapshotService {
    pub fn new(service: SnapshotService) -> Self {
        Self {
            inner: RwLock::new(Arc::new(service)),
        }
    }

    pub async fn current(&self) -> Arc<SnapshotService> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, service: SnapshotService) {
        info!(
            "Switching snapshot service to {} (data_mode={})",
            service.provider_id(),
            service.settings().data_mode
        );
        *self.inner.write().await = Arc::new(service);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{DataMode, Settings};
    use wallboard_market_data::{DeterministicProvider, NullProvider};

    #[tokio::test]
    async fn test_replace_swaps_active_service() {
        let shared = SharedSnapshotService::new(SnapshotService::new(
            Arc::new(DeterministicProvider::new()),
            Settings::default(),
        ));
        let before = shared.current().await;
        assert_eq!(before.provider_id(), "MOCK");

        shared
            .replace(SnapshotService::new(
                Arc::new(NullProvider),
                Settings::default().with_data_mode(DataMode::Open),
            ))
            .await;

        let after = shared.current().await;
        assert_eq!(after.provider_id(), "NULL");
        assert_eq!(after.settings().data_mode, DataMode::Open);
        // Holders of the old handle keep a working service.
        assert!(!before.get_snapshot().await.indices.is_empty());
    }
}
