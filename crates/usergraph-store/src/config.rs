use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the remote object store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Collection URL. Objects live at `<base_url>/<id>`.
    pub base_url: String,
    /// Per-request timeout. Expiry surfaces as a transport error.
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8085/objects".into(),
            timeout_ms: 5_000,
        }
    }
}
