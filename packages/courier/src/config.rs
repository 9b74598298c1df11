use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for a [`PersistenceGateway`](crate::PersistenceGateway).
///
/// Every field is optional when loaded from JSON; missing fields take their
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Where the request/response history is kept.
    pub database_path: PathBuf,

    /// Connect and overall timeout for each request, in seconds.
    pub timeout_secs: u64,
}

impl Config {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GatewayError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `<local data dir>/courier/history.db`, or `courier.db` in the working
    /// directory when the platform has no data dir.
    pub fn default_database_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("courier").join("history.db"))
            .unwrap_or_else(|| PathBuf::from("courier.db"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
