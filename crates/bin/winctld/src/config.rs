//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `winctl.toml` in the working directory, or at the path named by
//! `WINCTL_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use winctl_adapter_getadmin::config::GetAdminConfig;
use winctl_app::bootstrap::BridgeConfig;
use winctl_app::provisioner::ProvisionerConfig;
use winctl_domain::device::Device;
use winctl_domain::error::ValidationError;

const DEFAULT_PATH: &str = "winctl.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Entity provisioning and routing.
    pub bridge: BridgeSection,
    /// How to reach the agents.
    pub agent: GetAdminConfig,
    /// Controlled PCs.
    pub devices: Vec<Device>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax). Wins over the two flags.
    pub filter: Option<String>,
    pub info: bool,
    pub debug: bool,
}

/// `[bridge]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    pub state_path: String,
    pub user_commands: Vec<String>,
    pub force: bool,
    pub settle_delay_ms: u64,
    pub base_delay_ms: u64,
    pub stagger_ms: u64,
}

impl Config {
    /// Load configuration from `winctl.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WINCTL_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("WINCTL_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("WINCTL_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("WINCTL_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("WINCTL_STATE_PATH") {
            self.bridge.state_path = val;
        }
        if let Some(val) = var("WINCTL_LOG") {
            self.logging.filter = Some(val);
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = Some(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.agent.port == 0 {
            return Err(ConfigError::Validation(
                "agent port must be non-zero".to_string(),
            ));
        }
        if self.agent.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "agent timeout must be non-zero".to_string(),
            ));
        }
        self.bridge_config().validate()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the `tracing` filter directive.
    #[must_use]
    pub fn log_filter(&self) -> String {
        if let Some(filter) = &self.logging.filter {
            filter.clone()
        } else if self.logging.debug {
            "info,winctl=debug".to_string()
        } else if self.logging.info {
            "info".to_string()
        } else {
            "warn".to_string()
        }
    }

    /// Return the immutable bridge configuration handed to the bootstrap.
    #[must_use]
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            devices: self.devices.clone(),
            user_commands: self.bridge.user_commands.clone(),
            state_path: self.bridge.state_path.clone(),
            force: self.bridge.force,
            settle_delay: Duration::from_millis(self.bridge.settle_delay_ms),
            provisioner: ProvisionerConfig {
                base_delay: Duration::from_millis(self.bridge.base_delay_ms),
                stagger: Duration::from_millis(self.bridge.stagger_ms),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            info: true,
            debug: false,
        }
    }
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            state_path: "Control-PC".to_string(),
            user_commands: Vec::new(),
            force: false,
            settle_delay_ms: 2_000,
            base_delay_ms: 500,
            stagger_ms: 20,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// The bridge section or the devices are invalid.
    #[error("invalid bridge configuration")]
    Bridge(#[from] ValidationError),
}
