//! Page configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use tabsync_tabs::AutoplaySettings;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the page was loaded with; its fragment seeds initial resolution
    pub page_url: String,
    pub autoplay: AutoplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    /// Interval used when a group does not set a valid one
    pub default_interval_ms: u64,
    /// Shortest interval a group may request
    pub min_interval_ms: u64,
}

impl Config {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON config document. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.autoplay.min_interval_ms == 0 {
            return Err(CoreError::Config(
                "autoplay.min_interval_ms must be positive".to_string(),
            ));
        }
        if self.autoplay.default_interval_ms < self.autoplay.min_interval_ms {
            return Err(CoreError::Config(format!(
                "autoplay.default_interval_ms ({}) is below autoplay.min_interval_ms ({})",
                self.autoplay.default_interval_ms, self.autoplay.min_interval_ms
            )));
        }
        Ok(())
    }

    pub fn autoplay_settings(&self) -> AutoplaySettings {
        AutoplaySettings {
            default_interval: Duration::from_millis(self.autoplay.default_interval_ms),
            min_interval: Duration::from_millis(self.autoplay.min_interval_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_url: "about:blank".to_string(),
            autoplay: AutoplayConfig::default(),
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 4000,
            min_interval_ms: 1500,
        }
    }
}
