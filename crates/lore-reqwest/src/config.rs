//! Shared HTTP client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration of the `reqwest::Client` every provider client is built on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or_else(|| format!("lore/{}", env!("CARGO_PKG_VERSION")))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds a `reqwest::Client` from this configuration.
    pub(crate) fn build_client(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(self.effective_timeout())
            .user_agent(self.effective_user_agent())
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ReqwestConfig::default();
        assert_eq!(config.effective_timeout(), Duration::from_secs(30));
        assert!(config.effective_user_agent().starts_with("lore/"));
    }

    #[test]
    fn zero_timeout_falls_back() {
        let config = ReqwestConfig::default().with_timeout(0);
        assert_eq!(config.effective_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn blank_user_agent_falls_back() {
        let config = ReqwestConfig::default().with_user_agent("  ");
        assert!(config.effective_user_agent().starts_with("lore/"));

        let config = ReqwestConfig::default().with_user_agent("lore-tests");
        assert_eq!(config.effective_user_agent(), "lore-tests");
    }

    #[test]
    fn builds_a_client() -> anyhow::Result<()> {
        ReqwestConfig::default().build_client()?;
        Ok(())
    }
}
