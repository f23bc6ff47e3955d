//! Service configuration with CLI argument parsing.
//!
//! The flags here are converted into the server's
//! [`ServiceConfig`](lore_server::service::ServiceConfig) through its builder,
//! so the same validation runs whether the config comes from the command
//! line or from code.
//!
//! ```bash
//! lore --stripe-price-id price_bundle \
//!      --stripe-image-only-price-id price_image \
//!      --sender-email shop@example.com \
//!      --admin-email ops@example.com \
//!      --lore-fragment-len 450 --lore-fragment-count 30
//! ```

use clap::Args;
use lore_core::chunk::{DEFAULT_FRAGMENT_COUNT, DEFAULT_FRAGMENT_LEN, DEFAULT_PREVIEW_LEN};
use lore_server::service::ServiceConfig as ServerServiceConfig;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// CLI service configuration with command-line argument parsing.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Price id charged for the lore and image bundle.
    #[arg(long, env = "STRIPE_PRICE_ID")]
    pub stripe_price_id: String,

    /// Price id charged for the image alone; defaults to the bundle price.
    #[arg(long, env = "STRIPE_IMAGE_ONLY_PRICE_ID")]
    pub stripe_image_only_price_id: Option<String>,

    /// Address every notification is sent from.
    #[arg(long, env = "SENDER_EMAIL")]
    pub sender_email: String,

    /// Operator address receiving purchase notifications.
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: String,

    /// Buyer address used when a checkout session carries none.
    #[arg(long, env = "FALLBACK_CUSTOMER_EMAIL")]
    pub fallback_customer_email: Option<String>,

    /// Origin used for redirect URLs when a request has no Origin or Host.
    #[arg(long, env = "PUBLIC_ORIGIN")]
    pub public_origin: Option<String>,

    /// Maximum characters per lore fragment in the checkout metadata.
    #[arg(long, env = "LORE_FRAGMENT_LEN", default_value_t = DEFAULT_FRAGMENT_LEN)]
    pub lore_fragment_len: usize,

    /// Maximum number of lore fragments in the checkout metadata.
    #[arg(long, env = "LORE_FRAGMENT_COUNT", default_value_t = DEFAULT_FRAGMENT_COUNT)]
    pub lore_fragment_count: usize,

    /// Characters kept in the lossy preview key.
    #[arg(long, env = "LORE_PREVIEW_LEN", default_value_t = DEFAULT_PREVIEW_LEN)]
    pub lore_preview_len: usize,
}

impl ServiceConfig {
    /// Converts into the server configuration, running its validation.
    ///
    /// # Errors
    ///
    /// Returns an error for blank prices, malformed addresses, a public
    /// origin without an http(s) scheme, or fragment limits that do not fit
    /// the metadata ceilings.
    pub fn into_server_config(self) -> anyhow::Result<ServerServiceConfig> {
        let mut builder = ServerServiceConfig::builder()
            .with_bundle_price_id(self.stripe_price_id)
            .with_sender_email(self.sender_email)
            .with_admin_email(self.admin_email)
            .with_fragment_len(self.lore_fragment_len)
            .with_fragment_count(self.lore_fragment_count)
            .with_preview_len(self.lore_preview_len);

        if let Some(price) = self.stripe_image_only_price_id {
            builder = builder.with_image_only_price_id(price);
        }
        if let Some(address) = self.fallback_customer_email {
            builder = builder.with_fallback_customer_email(address);
        }
        if let Some(origin) = self.public_origin {
            builder = builder.with_public_origin(origin);
        }

        Ok(builder.build()?)
    }

    /// Logs the service configuration (addresses are not secrets).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bundle_price = %self.stripe_price_id,
            image_only_price = ?self.stripe_image_only_price_id,
            sender = %self.sender_email,
            admin = %self.admin_email,
            public_origin = ?self.public_origin,
            fragment_len = self.lore_fragment_len,
            fragment_count = self.lore_fragment_count,
            "Service configuration"
        );
    }
}
