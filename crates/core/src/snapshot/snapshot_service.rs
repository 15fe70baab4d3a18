use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use wallboard_market_data::{AssetClass, MarketDataProvider, QuoteMap, ShortTermBoards};

use super::snapshot_model::{CalendarSection, ClassPayloads, Snapshot};
use crate::cache::{cache_key, SnapshotCache};
use crate::errors::Result;
use crate::settings::Settings;

/// Data of one asset class as it travels through the snapshot cache.
pub trait ClassPayload: Serialize + DeserializeOwned + Send {
    fn item_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

impl ClassPayload for QuoteMap {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl ClassPayload for CalendarSection {
    fn item_count(&self) -> usize {
        self.events.len()
    }
}

impl ClassPayload for ShortTermBoards {
    fn item_count(&self) -> usize {
        self.hot_boards.len() + self.cold_boards.len() + self.capital_boards.len()
    }
}

/// Assembles snapshots from the active provider and the optional cache.
///
/// A class is served from the cache only while its last provider fetch is
/// younger than `snapshot_cache_ttl`; otherwise the provider is called and
/// the result written back. Classes are loaded concurrently.
pub struct SnapshotService {
    provider: Arc<dyn MarketDataProvider>,
    cache: Option<Arc<dyn SnapshotCache>>,
    settings: Settings,
    last_fetch: RwLock<HashMap<AssetClass, DateTime<Utc>>>,
    refresh_guard: Mutex<()>,
}

impl SnapshotService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: Settings) -> Self {
        Self {
            provider,
            cache: None,
            settings,
            last_fetch: RwLock::new(HashMap::new()),
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn SnapshotCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Builds a complete snapshot.
    pub async fn get_snapshot(&self) -> Snapshot {
        let provider = &self.provider;
        let (indices, fx, rates, commodities, us_stocks, crypto, calendar, a_share_short_term) =
            tokio::join!(
                self.load(AssetClass::Indices, move || provider.fetch_indices()),
                self.load(AssetClass::Fx, move || provider.fetch_fx()),
                self.load(AssetClass::Rates, move || provider.fetch_rates()),
                self.load(AssetClass::Commodities, move || provider.fetch_commodities()),
                self.load(AssetClass::UsStocks, move || provider.fetch_us_stocks()),
                self.load(AssetClass::Crypto, move || provider.fetch_crypto()),
                self.load(AssetClass::Calendar, move || async move {
                    CalendarSection {
                        events: provider.fetch_calendar().await,
                    }
                }),
                self.load(AssetClass::AShareShortTerm, move || {
                    provider.fetch_a_share_short_term()
                }),
            );

        Snapshot::assemble(
            Utc::now(),
            self.settings.data_mode,
            ClassPayloads {
                indices,
                fx,
                rates,
                commodities,
                us_stocks,
                crypto,
                calendar,
                a_share_short_term,
            },
        )
    }

    /// Background-refresh entry point.
    ///
    /// Returns `None` without touching the provider when another refresh is
    /// still running.
    pub async fn refresh(&self) -> Option<Snapshot> {
        let Ok(_guard) = self.refresh_guard.try_lock() else {
            debug!("Snapshot refresh already in flight, skipping");
            return None;
        };
        info!("Running background snapshot refresh ({})", self.provider.id());
        Some(self.get_snapshot().await)
    }

    async fn load<T, F, Fut>(&self, class: AssetClass, fetch: F) -> T
    where
        T: ClassPayload,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(cached) = self.cached::<T>(class).await {
            debug!("Serving {} from snapshot cache", class);
            return cached;
        }

        let data = fetch().await;
        if let Err(e) = self.store(class, &data).await {
            error!("Failed to cache {} data: {}", class, e);
        }
        self.last_fetch.write().await.insert(class, Utc::now());

        info!("Fetched fresh {} data with {} items", class, data.item_count());
        data
    }

    async fn cached<T: ClassPayload>(&self, class: AssetClass) -> Option<T> {
        let cache = self.cache.as_ref()?;
        let fetched_at = *self.last_fetch.read().await.get(&class)?;
        if !self.is_fresh(fetched_at) {
            return None;
        }

        match cache.get(&cache_key(class.as_str())).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Discarding unreadable cached {} data: {}", class, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Snapshot cache read for {} failed: {}", class, e);
                None
            }
        }
    }

    async fn store<T: ClassPayload>(&self, class: AssetClass, data: &T) -> Result<()> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        if data.is_empty() {
            return Ok(());
        }
        let payload = serde_json::to_vec(data)?;
        cache
            .set(&cache_key(class.as_str()), payload, self.settings.snapshot_cache_ttl)
            .await
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        chrono::Duration::from_std(self.settings.snapshot_cache_ttl)
            .is_ok_and(|ttl| Utc::now().signed_duration_since(fetched_at) < ttl)
    }
}
