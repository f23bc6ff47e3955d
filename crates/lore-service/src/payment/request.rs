//! Checkout session creation request.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Parameters of a single-item card checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// Provider price identifier of the purchased product.
    pub price_id: String,
    /// Number of units.
    pub quantity: u32,
    /// Redirect after payment. May contain `{CHECKOUT_SESSION_ID}`.
    pub success_url: String,
    /// Redirect when the buyer backs out.
    pub cancel_url: String,
    /// Metadata attached to the session.
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutRequest {
    /// Creates a request for one unit of `price_id`.
    pub fn new(
        price_id: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            price_id: price_id.into(),
            quantity: 1,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Adds every entry of `entries`, replacing existing keys.
    pub fn with_metadata_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}
