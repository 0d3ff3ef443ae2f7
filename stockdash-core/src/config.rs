//! Dashboard configuration, read from TOML.
//!
//! Location: `{config_dir}/stockdash/config.toml`. A missing file means
//! defaults; a present but invalid file is an error the caller decides about.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::provider::{DataError, DataProvider};
use crate::data::synthetic::SyntheticProvider;
use crate::data::yahoo::{self, YahooProvider};
use crate::present::DEFAULT_CHART_HEIGHT;
use crate::request::DEFAULT_LOOKBACK_DAYS;

/// Upper bound on `lookback_days` (one century).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config {path}: {field} {reason}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Which price source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Ticker pre-filled in the input form.
    pub default_ticker: String,
    /// Days between the default start date and today.
    pub lookback_days: i64,
    /// How long an identical request reuses the previous result.
    pub memo_ttl_secs: u64,
    pub provider: ProviderKind,
    pub yahoo_base_url: String,
    pub user_agent: String,
    pub chart_height: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_ticker: "AAPL".into(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            memo_ttl_secs: 3600,
            provider: ProviderKind::Yahoo,
            yahoo_base_url: yahoo::DEFAULT_BASE_URL.into(),
            user_agent: yahoo::DEFAULT_USER_AGENT.into(),
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl DashboardConfig {
    /// `{config_dir}/stockdash/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stockdash").join("config.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Range checks serde cannot express.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if !(0..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                field: "lookback_days",
                reason: format!(
                    "must be between 0 and {MAX_LOOKBACK_DAYS}, got {}",
                    self.lookback_days
                ),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn memo_ttl(&self) -> Duration {
        Duration::from_secs(self.memo_ttl_secs)
    }

    /// Build the configured provider.
    pub fn build_provider(&self) -> Result<Box<dyn DataProvider>, DataError> {
        Ok(match self.provider {
            ProviderKind::Yahoo => Box::new(YahooProvider::new(
                self.yahoo_base_url.as_str(),
                &self.user_agent,
            )?),
            ProviderKind::Synthetic => Box::new(SyntheticProvider::new()),
        })
    }
}
