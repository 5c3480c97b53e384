//! GetAdmin agent configuration.

use std::time::Duration;

use serde::Deserialize;

/// How to reach the agents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GetAdminConfig {
    /// TCP port every agent listens on.
    pub port: u16,
    /// Request timeout in milliseconds; a slower agent counts as unreachable.
    pub timeout_ms: u64,
}

impl GetAdminConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GetAdminConfig {
    fn default() -> Self {
        Self {
            port: 8585,
            timeout_ms: 5_000,
        }
    }
}
