//! Configuration management for lifeline.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "lifeline";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LIFELINE_`, sections split on `__`)
/// 2. TOML config file at `~/.config/lifeline/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Refresh cadence configuration.
    pub refresh: RefreshConfig,
    /// Login configuration.
    pub auth: AuthConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL that endpoint paths are appended to.
    pub base_url: String,
    /// Connect timeout in milliseconds. 0 disables the timeout.
    pub connect_timeout_ms: u64,
}

/// Refresh cadence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Dashboard KPI and fleet refresh interval.
    pub dashboard_interval_ms: u64,
    /// Tracking page progress interval.
    pub tracking_interval_ms: u64,
    /// Relative "time ago" label interval.
    pub time_label_interval_ms: u64,
    /// Frame interval for count-up animations.
    pub frame_interval_ms: u64,
}

/// When to fall back to the offline credential table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineFallback {
    /// After any backend failure or rejection.
    #[default]
    Always,
    /// Only when the backend could not be reached at all.
    TransportOnly,
    /// Never; the backend is authoritative.
    Never,
}

/// Login configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Offline credential fallback policy.
    pub offline_fallback: OfflineFallback,
    /// How long a login error stays on screen.
    pub error_dismiss_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            connect_timeout_ms: 0,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            dashboard_interval_ms: 5_000,
            tracking_interval_ms: 3_000,
            time_label_interval_ms: 30_000,
            frame_interval_ms: 16,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            offline_fallback: OfflineFallback::Always,
            error_dismiss_ms: 5_000,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("LIFELINE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = reqwest::Url::parse(&self.api.base_url) {
            return Err(Error::ConfigValidation {
                message: format!("invalid api.base_url '{}': {e}", self.api.base_url),
            });
        }

        let intervals = [
            ("dashboard_interval_ms", self.refresh.dashboard_interval_ms),
            ("tracking_interval_ms", self.refresh.tracking_interval_ms),
            ("time_label_interval_ms", self.refresh.time_label_interval_ms),
            ("frame_interval_ms", self.refresh.frame_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be greater than 0"),
                });
            }
        }

        Ok(())
    }

    /// Get the dashboard refresh interval as a Duration.
    #[must_use]
    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.dashboard_interval_ms)
    }

    /// Get the tracking refresh interval as a Duration.
    #[must_use]
    pub fn tracking_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.tracking_interval_ms)
    }

    /// Get the time label refresh interval as a Duration.
    #[must_use]
    pub fn time_label_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.time_label_interval_ms)
    }

    /// Get the animation frame interval as a Duration.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.frame_interval_ms)
    }

    /// Get the login error display time as a Duration.
    #[must_use]
    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.auth.error_dismiss_ms)
    }

    /// Get the connect timeout, if one is configured.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        if self.api.connect_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.api.connect_timeout_ms))
        }
    }
}
