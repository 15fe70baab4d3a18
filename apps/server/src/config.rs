use std::{net::SocketAddr, time::Duration};

use wallboard_core::settings::{DataMode, Settings, DEFAULT_SNAPSHOT_CACHE_TTL_SECS};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_mode: String,
    pub cache_enabled: bool,
    pub snapshot_cache_ttl: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let listen_addr: SocketAddr = var("WALLBOARD_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid WALLBOARD_LISTEN_ADDR");
        let data_mode = var("WALLBOARD_DATA_MODE").unwrap_or_else(|| "mock".into());
        let cache_enabled = var("WALLBOARD_CACHE_ENABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let ttl_secs: u64 = var("WALLBOARD_SNAPSHOT_CACHE_TTL")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_SNAPSHOT_CACHE_TTL_SECS);
        let cors_allow = var("WALLBOARD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("WALLBOARD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);
        Self {
            listen_addr,
            data_mode,
            cache_enabled,
            snapshot_cache_ttl: Duration::from_secs(ttl_secs),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Core settings; fails on an unknown data mode.
    pub fn settings(&self) -> wallboard_core::Result<Settings> {
        let data_mode: DataMode = self.data_mode.parse()?;
        Ok(Settings {
            data_mode,
            cache_enabled: self.cache_enabled,
            snapshot_cache_ttl: self.snapshot_cache_ttl,
        })
    }
}
