//! Checkout session as returned by the provider.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Payment state of a checkout session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

/// Buyer details collected by the hosted checkout page.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A checkout session.
///
/// Field names follow the provider's JSON so sessions deserialize directly
/// from API responses and webhook event objects.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Returns the buyer address entered on the checkout page, falling back
    /// to the address the session was created with.
    pub fn customer_address(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|details| details.email.as_deref())
            .into_iter()
            .chain(self.customer_email.as_deref())
            .map(str::trim)
            .find(|email| !email.is_empty())
    }

    /// Returns a non-blank metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_json() -> anyhow::Result<()> {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_test_123",
            "object": "checkout.session",
            "url": null,
            "payment_status": "paid",
            "customer_email": null,
            "customer_details": { "email": "buyer@example.com", "name": "Rowan", "phone": null },
            "metadata": { "pseudo": "Rowan", "lore_1": "Tell me lamb" }
        }))?;

        assert!(session.is_paid());
        assert_eq!(session.customer_address(), Some("buyer@example.com"));
        assert_eq!(session.metadata_value("pseudo"), Some("Rowan"));
        Ok(())
    }

    #[test]
    fn unknown_status_does_not_fail() -> anyhow::Result<()> {
        let session: CheckoutSession =
            serde_json::from_str(r#"{"id":"cs_1","payment_status":"refunded"}"#)?;
        assert_eq!(session.payment_status, PaymentStatus::Unknown);
        assert!(!session.is_paid());
        Ok(())
    }

    #[test]
    fn customer_address_falls_back() {
        let mut session = CheckoutSession {
            id: "cs_1".into(),
            customer_email: Some("prefill@example.com".into()),
            customer_details: Some(CustomerDetails {
                email: Some("  ".into()),
                name: None,
            }),
            ..Default::default()
        };
        assert_eq!(session.customer_address(), Some("prefill@example.com"));

        session.customer_email = None;
        assert_eq!(session.customer_address(), None);
    }
}
