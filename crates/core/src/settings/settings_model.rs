use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Default freshness window of snapshot-cache entries, in seconds.
pub const DEFAULT_SNAPSHOT_CACHE_TTL_SECS: u64 = 15;

/// Which provider backs the snapshot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Proprietary terminal session, degrading to deterministic data.
    Wind,
    /// Public upstream sources aggregated per asset class.
    Open,
    /// Deterministic dataset for local development.
    #[default]
    Mock,
}

impl DataMode {
    pub const ALL: [DataMode; 3] = [DataMode::Wind, DataMode::Open, DataMode::Mock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wind => "wind",
            Self::Open => "open",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::InvalidConfigValue("Invalid data_mode".to_string()))
    }
}

/// Runtime settings of the snapshot pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub data_mode: DataMode,
    pub cache_enabled: bool,
    pub snapshot_cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_mode: DataMode::default(),
            cache_enabled: false,
            snapshot_cache_ttl: Duration::from_secs(DEFAULT_SNAPSHOT_CACHE_TTL_SECS),
        }
    }
}

impl Settings {
    /// Copy of these settings running in a different mode.
    pub fn with_data_mode(&self, data_mode: DataMode) -> Self {
        Self {
            data_mode,
            ..self.clone()
        }
    }
}
