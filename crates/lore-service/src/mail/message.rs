//! Mail message types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A plain-text message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Unique identifier for this message.
    pub message_id: Uuid,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl MailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            message_id: Uuid::now_v7(),
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
        }
    }
}

/// Acknowledgement returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailReceipt {
    /// Provider-assigned identifier, when the provider returns one.
    pub provider_id: Option<String>,
}
