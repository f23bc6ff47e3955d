//! Purchase notifications.
//!
//! Every paid session produces one message to the operator and, when the
//! buyer's address is known, one message to the buyer. Delivery failures are
//! logged and reported in a [`DeliveryReport`]; they never fail the request
//! that triggered them.

use std::fmt::Write as _;

use lore_core::chunk::{DecodeTier, Decoded};
use lore_service::payment::CheckoutSession;
use lore_service::mail::{MailMessage, MailService};

/// Tracing target for notification dispatch.
const TRACING_TARGET: &str = "lore_server::service::notification";

/// Everything the notifications say about one purchase.
#[derive(Debug, Clone, Default)]
pub struct Purchase<'a> {
    pub session_id: &'a str,
    pub pseudo: &'a str,
    pub genre: &'a str,
    pub role: &'a str,
    pub lore: &'a str,
    pub customer_email: Option<&'a str>,
    /// Set when the lore was reconstructed lossily or incompletely.
    pub degraded_decode: Option<DecodeTier>,
}

impl<'a> Purchase<'a> {
    /// Reads the profile stored in the session metadata.
    ///
    /// The lore is left empty; see [`Purchase::with_decoded`].
    pub fn from_session(session: &'a CheckoutSession) -> Self {
        let field = |key: &str| session.metadata_value(key).unwrap_or_default();
        Self {
            session_id: &session.id,
            pseudo: field("pseudo"),
            genre: field("genre"),
            role: field("role"),
            ..Self::default()
        }
    }

    /// Records how the lore was decoded, keeping the tier only when the
    /// operator should double-check the text.
    pub fn with_decoded(mut self, decoded: &'a Decoded) -> Self {
        self.lore = decoded.text();
        self.degraded_decode = decoded.is_incomplete().then(|| decoded.tier());
        self
    }

    fn pseudo_or(&self, fallback: &'a str) -> &'a str {
        Some(self.pseudo)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// Subject and body of the operator message.
    pub fn admin_message(&self) -> (String, String) {
        let subject = format!("New Lore Purchase - {}", self.pseudo_or("Unknown"));

        let mut body = format!(
            "Pseudo: {}\nEmail client: {}\nGenre: {}\nRole: {}\n\nLore (len={}):\n{}\n\nRaw session id: {}",
            self.pseudo_or("Unknown"),
            self.customer_email.unwrap_or("unknown"),
            self.genre,
            self.role,
            self.lore.chars().count(),
            self.lore,
            self.session_id,
        );
        if let Some(tier) = self.degraded_decode {
            let _ = write!(body, "\nDecode: {tier}");
        }

        (subject, body)
    }

    /// Subject and body of the buyer message.
    pub fn customer_message(&self) -> (String, String) {
        let subject = format!("Your personalized Lore - {}", self.pseudo);
        let body = format!(
            "Here is your lore:\n\n{}\n\nThanks for your support!\n— Lore of Legends",
            self.lore
        );
        (subject, body)
    }
}

/// Which notifications reached the mail provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub admin: bool,
    /// `None` when no buyer address was known.
    pub customer: Option<bool>,
}

/// Sends purchase notifications through a [`MailService`].
#[derive(Debug, Clone)]
pub struct Notifier {
    mail: MailService,
    sender: String,
    admin: String,
    fallback_customer: Option<String>,
}

impl Notifier {
    pub fn new(mail: MailService, sender: impl Into<String>, admin: impl Into<String>) -> Self {
        Self {
            mail,
            sender: sender.into(),
            admin: admin.into(),
            fallback_customer: None,
        }
    }

    #[must_use]
    pub fn with_fallback_customer(mut self, address: Option<String>) -> Self {
        self.fallback_customer = address.filter(|a| !a.trim().is_empty());
        self
    }

    /// Returns the buyer address of `session`, or the configured fallback.
    pub fn customer_address<'a>(&'a self, session: &'a CheckoutSession) -> Option<&'a str> {
        session
            .customer_address()
            .or(self.fallback_customer.as_deref())
    }

    /// Sends both notifications concurrently.
    pub async fn dispatch(&self, purchase: &Purchase<'_>) -> DeliveryReport {
        let (subject, text) = purchase.admin_message();
        let admin = MailMessage::new(&self.sender, &self.admin, subject, text);

        let customer = purchase.customer_email.map(|to| {
            let (subject, text) = purchase.customer_message();
            MailMessage::new(&self.sender, to, subject, text)
        });

        let (admin, customer) = tokio::join!(self.deliver(&admin, "admin"), async {
            match &customer {
                Some(message) => Some(self.deliver(message, "customer").await),
                None => None,
            }
        });

        let report = DeliveryReport { admin, customer };
        tracing::info!(
            target: TRACING_TARGET,
            session_id = %purchase.session_id,
            admin_delivered = report.admin,
            customer_delivered = ?report.customer,
            "Purchase notifications dispatched"
        );
        report
    }

    async fn deliver(&self, message: &MailMessage, audience: &'static str) -> bool {
        match self.mail.send(message).await {
            Ok(_) => true,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    audience,
                    message_id = %message.message_id,
                    error = %error,
                    "Notification not delivered"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lore_service::mail::MockMailProvider;

    use super::*;

    fn purchase() -> Purchase<'static> {
        Purchase {
            session_id: "cs_test_1",
            pseudo: "Himmel",
            genre: "epic",
            role: "top",
            lore: "Wolf: Tell me lamb, who is Himmel?",
            customer_email: Some("buyer@example.com"),
            degraded_decode: None,
        }
    }

    fn notifier(provider: &MockMailProvider) -> Notifier {
        Notifier::new(
            MailService::from_provider(provider.clone()),
            "shop@lore.example",
            "ops@lore.example",
        )
    }

    #[test]
    fn admin_message_layout() {
        let (subject, body) = purchase().admin_message();
        assert_eq!(subject, "New Lore Purchase - Himmel");
        assert_eq!(
            body,
            "Pseudo: Himmel\nEmail client: buyer@example.com\nGenre: epic\nRole: top\n\n\
             Lore (len=34):\nWolf: Tell me lamb, who is Himmel?\n\nRaw session id: cs_test_1"
        );
    }

    #[test]
    fn admin_message_flags_degraded_decode() {
        let purchase = Purchase {
            pseudo: "",
            customer_email: None,
            degraded_decode: Some(DecodeTier::Preview),
            ..purchase()
        };
        let (subject, body) = purchase.admin_message();
        assert_eq!(subject, "New Lore Purchase - Unknown");
        assert!(body.contains("Email client: unknown"));
        assert!(body.ends_with("\nDecode: preview"));
    }

    #[test]
    fn customer_message_layout() {
        let (subject, body) = purchase().customer_message();
        assert_eq!(subject, "Your personalized Lore - Himmel");
        assert!(body.starts_with("Here is your lore:\n\nWolf:"));
        assert!(body.ends_with("Thanks for your support!\n— Lore of Legends"));
    }

    #[tokio::test]
    async fn dispatch_sends_both() -> anyhow::Result<()> {
        let provider = MockMailProvider::new();
        let report = notifier(&provider).dispatch(&purchase()).await;

        assert_eq!(
            report,
            DeliveryReport {
                admin: true,
                customer: Some(true)
            }
        );
        let sent = provider.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|m| m.from == "shop@lore.example"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_delivery_is_reported_not_raised() -> anyhow::Result<()> {
        let provider = MockMailProvider::new();
        provider.reject("buyer@example.com").await;

        let report = notifier(&provider).dispatch(&purchase()).await;
        assert!(report.admin);
        assert_eq!(report.customer, Some(false));
        assert_eq!(provider.sent().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn no_customer_message_without_address() -> anyhow::Result<()> {
        let provider = MockMailProvider::new();
        let purchase = Purchase {
            customer_email: None,
            ..purchase()
        };

        let report = notifier(&provider).dispatch(&purchase).await;
        assert_eq!(report.customer, None);
        assert_eq!(provider.sent().await.len(), 1);
        Ok(())
    }

    #[test]
    fn purchase_from_session_metadata() {
        let mut session = CheckoutSession {
            id: "cs_test_9".into(),
            ..CheckoutSession::default()
        };
        session.metadata.insert("pseudo".into(), "Rowan".into());
        session.metadata.insert("role".into(), "  ".into());

        let purchase = Purchase::from_session(&session);
        assert_eq!(purchase.session_id, "cs_test_9");
        assert_eq!(purchase.pseudo, "Rowan");
        assert_eq!(purchase.genre, "");
        assert_eq!(purchase.role, "");
    }

    #[test]
    fn fallback_customer_address() {
        let notifier = notifier(&MockMailProvider::new())
            .with_fallback_customer(Some("fallback@lore.example".into()));
        let session = CheckoutSession::default();
        assert_eq!(
            notifier.customer_address(&session),
            Some("fallback@lore.example")
        );
    }
}
