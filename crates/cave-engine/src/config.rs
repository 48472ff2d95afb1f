//! Settings for the HTTP report feed.

use std::time::Duration;

use crate::error::{CaveError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.garmoth.com/api/golden-pig-cave-reports";
pub const DEFAULT_REGION: &str = "eu";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The feed rejects clients that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:106.0) Gecko/20100101 Firefox/106.0";

/// Where and how to fetch reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub endpoint: String,
    pub region: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    /// Check the settings before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidConfig`] for a non-http(s) endpoint, an
    /// empty region or user agent, or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(CaveError::InvalidConfig(format!(
                "endpoint must be an http(s) URL: '{}'",
                self.endpoint
            )));
        }
        if self.region.trim().is_empty() {
            return Err(CaveError::InvalidConfig("region is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(CaveError::InvalidConfig("timeout must be non-zero".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CaveError::InvalidConfig("user agent is empty".to_string()));
        }
        Ok(())
    }
}
