//! Mail API configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default mail API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MailApiConfig {
    /// Endpoint receiving one message per POST
    #[cfg_attr(
        feature = "config",
        arg(
            id = "mail_api_url",
            long = "mail-api-url",
            env = "MAIL_API_URL",
            default_value = DEFAULT_API_URL,
        )
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token of the mail API
    #[cfg_attr(
        feature = "config",
        arg(
            id = "mail_api_key",
            long = "mail-api-key",
            env = "MAIL_API_KEY",
            hide_env_values = true,
        )
    )]
    pub api_key: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

impl fmt::Debug for MailApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailApiConfig")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl MailApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            api_key: api_key.into(),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("MAIL_API_URL is invalid: {e}")))?;
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("MAIL_API_KEY is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert!(MailApiConfig::new("re_123").validate().is_ok());
        assert!(MailApiConfig::new("").validate().is_err());
        assert!(
            MailApiConfig::new("re_123")
                .with_api_url("mail.example.com")
                .validate()
                .is_err()
        );
    }
}
