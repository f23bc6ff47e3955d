//! Webhook events.

use serde::{Deserialize, Serialize};

use super::CheckoutSession;
use crate::{Error, Result};

/// Event type sent once a checkout session is paid.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Object wrapper of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// A verified webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: EventData,
}

impl PaymentEvent {
    pub fn is_checkout_completed(&self) -> bool {
        self.kind == CHECKOUT_SESSION_COMPLETED
    }

    /// Parses the event object as a checkout session.
    pub fn checkout_session(&self) -> Result<CheckoutSession> {
        CheckoutSession::deserialize(&self.data.object).map_err(|error| {
            Error::serialization()
                .with_message(format!("event {} does not carry a checkout session", self.id))
                .with_source(error)
        })
    }
}
