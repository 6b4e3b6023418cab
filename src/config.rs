//! Runtime settings.
//!
//! Defaults are compiled in. An optional YAML file (passed with `--config`)
//! may override any subset of them; missing keys keep their defaults.
//!
//! ```yaml
//! base_url: https://www.rightmove.co.uk/house-prices
//! page_delay_secs: 3
//! request_timeout_secs: 30
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.rightmove.co.uk/house-prices";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TRANSIT_ENDPOINT: &str =
    "https://api.external.citymapper.com/api/1/directions/transit";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Sold-prices search root, without trailing slash.
    pub base_url: String,
    pub user_agent: String,
    /// Fixed pause between consecutive page fetches.
    pub page_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub transit_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_delay_secs: 3,
            request_timeout_secs: 30,
            transit_endpoint: DEFAULT_TRANSIT_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or return the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let mut settings: Settings = serde_yaml::from_str(raw)?;
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        if settings.base_url.is_empty() {
            return Err(Error::Config("base_url must not be empty".to_string()));
        }
        if settings.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(settings)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
