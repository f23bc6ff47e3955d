//! Checkout, webhook and fulfillment response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A hosted checkout session the buyer should be redirected to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckoutSessionCreated {
    pub id: String,
    pub url: Option<String>,
}

/// Acknowledges a verified webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebhookReceived {
    pub received: bool,
}

impl Default for WebhookReceived {
    fn default() -> Self {
        Self { received: true }
    }
}

/// Acknowledges a fulfilled session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Fulfilled {
    pub ok: bool,
}

impl Default for Fulfilled {
    fn default() -> Self {
        Self { ok: true }
    }
}
