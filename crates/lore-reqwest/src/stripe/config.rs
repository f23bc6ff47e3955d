//! Stripe client configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default Stripe API base URL.
pub const DEFAULT_API_URL: &str = "https://api.stripe.com/v1";

/// Default accepted age of a signed webhook, in seconds.
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: u64 = 300;

/// Credentials and endpoints of the Stripe account.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StripeConfig {
    /// Secret API key (`sk_live_...` or `sk_test_...`)
    #[cfg_attr(
        feature = "config",
        arg(long = "stripe-secret-key", env = "STRIPE_SECRET_KEY", hide_env_values = true)
    )]
    pub secret_key: String,

    /// Webhook endpoint signing secret (`whsec_...`)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "stripe-webhook-secret",
            env = "STRIPE_WEBHOOK_SECRET",
            hide_env_values = true
        )
    )]
    pub webhook_secret: String,

    /// Stripe API base URL
    #[cfg_attr(
        feature = "config",
        arg(
            id = "stripe_api_url",
            long = "stripe-api-url",
            env = "STRIPE_API_URL",
            default_value = DEFAULT_API_URL,
        )
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Maximum age of a signed webhook event in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "stripe-webhook-tolerance",
            env = "STRIPE_WEBHOOK_TOLERANCE",
            default_value_t = DEFAULT_WEBHOOK_TOLERANCE_SECS
        )
    )]
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_webhook_tolerance() -> u64 {
    DEFAULT_WEBHOOK_TOLERANCE_SECS
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_url", &self.api_url)
            .field("webhook_tolerance", &self.webhook_tolerance)
            .finish_non_exhaustive()
    }
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            api_url: default_api_url(),
            webhook_tolerance: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Returns true when the secret key targets test mode.
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Appends `segments` to the API base URL.
    ///
    /// Each segment is percent-encoded, so `/`, `..` and `?` inside one stay
    /// part of that segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("STRIPE_API_URL is invalid: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::Config("STRIPE_API_URL cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Checks that both secrets are present and the base URL parses.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("STRIPE_API_URL is invalid: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config("STRIPE_API_URL must use http or https".into()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(Error::Config("STRIPE_SECRET_KEY is empty".into()));
        }
        if self.webhook_secret.trim().is_empty() {
            return Err(Error::Config("STRIPE_WEBHOOK_SECRET is empty".into()));
        }
        Ok(())
    }
}
