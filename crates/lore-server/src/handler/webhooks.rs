//! Payment webhook.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use lore_core::chunk::LoreCodec;
use lore_service::{ErrorKind as ProviderErrorKind, PaymentService};

use crate::extract::{Json, StripeSignature};
use crate::handler::response::{ErrorResponse, WebhookReceived};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{Notifier, Purchase, ServiceState};

/// Tracing target for webhook operations.
const TRACING_TARGET: &str = "lore_server::handler::webhooks";

/// Maps a verification failure onto the webhook error responses.
fn rejection(error: lore_service::Error) -> Error<'static> {
    match error.kind() {
        ProviderErrorKind::Authentication => {
            tracing::warn!(target: TRACING_TARGET, %error, "Webhook signature rejected");
            ErrorKind::InvalidSignature.with_context(error.to_string())
        }
        ProviderErrorKind::Serialization | ProviderErrorKind::InvalidInput => {
            tracing::warn!(target: TRACING_TARGET, %error, "Webhook payload rejected");
            ErrorKind::BadRequest
                .with_message("Invalid webhook payload")
                .with_context(error.to_string())
        }
        _ => error.into(),
    }
}

/// Verifies a provider event and mails the lore of completed checkouts.
#[tracing::instrument(skip_all, fields(payload_len = body.len()))]
async fn receive_webhook(
    State(payment): State<PaymentService>,
    State(codec): State<LoreCodec>,
    State(notifier): State<Notifier>,
    signature: StripeSignature,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookReceived>)> {
    let event = payment.verify_event(&body, &signature).map_err(rejection)?;

    if !event.is_checkout_completed() {
        tracing::debug!(
            target: TRACING_TARGET,
            event_id = %event.id,
            event_type = %event.kind,
            "Ignoring webhook event"
        );
        return Ok((StatusCode::OK, Json(WebhookReceived::default())));
    }

    let session = event.checkout_session().map_err(rejection)?;
    let decoded = codec.decode(&session.metadata);
    if decoded.is_absent() || decoded.is_incomplete() {
        tracing::warn!(
            target: TRACING_TARGET,
            session_id = %session.id,
            tier = %decoded.tier(),
            "Completed session carries no complete lore"
        );
    }

    let purchase = Purchase {
        customer_email: notifier.customer_address(&session),
        ..Purchase::from_session(&session).with_decoded(&decoded)
    };
    let report = notifier.dispatch(&purchase).await;

    tracing::info!(
        target: TRACING_TARGET,
        event_id = %event.id,
        session_id = %session.id,
        admin_delivered = report.admin,
        "Checkout completion handled"
    );

    Ok((StatusCode::OK, Json(WebhookReceived::default())))
}

fn receive_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Receive payment webhook")
        .description(
            "Verifies the `Stripe-Signature` header against the raw body. Completed \
             checkouts have their lore rebuilt from the session metadata and mailed to \
             the operator and the buyer. Other events are acknowledged and ignored.",
        )
        .response::<200, Json<WebhookReceived>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the webhook route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/api/webhook",
            post_with(receive_webhook, receive_webhook_docs),
        )
        .with_path_items(|item| item.tag("Checkout"))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use lore_core::chunk::LoreCodec;
    use serde_json::json;

    use super::*;
    use crate::extract::STRIPE_SIGNATURE_HEADER;
    use crate::handler::test::create_test_server_with_providers;
    use crate::service::MockProviders;

    const LORE: &str = "Wolf: Tell me lamb, who is OogieBoogie?\nLamb: A nightmare in Bilgewater.";

    fn completed_event(metadata: serde_json::Value) -> Vec<u8> {
        json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_test_1",
                "payment_status": "paid",
                "customer_details": { "email": "buyer@example.com" },
                "metadata": metadata,
            }},
        })
        .to_string()
        .into_bytes()
    }

    fn lore_metadata() -> serde_json::Value {
        let mut metadata = serde_json::Map::new();
        metadata.insert("pseudo".into(), "OogieBoogie".into());
        metadata.insert("genre".into(), "horror".into());
        metadata.insert("role".into(), "support".into());
        for (key, value) in LoreCodec::default().encode(LORE) {
            metadata.insert(key, value.into());
        }
        metadata.into()
    }

    #[tokio::test]
    async fn completed_checkout_sends_notifications() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let payload = completed_event(lore_metadata());
        let signature = providers
            .payment
            .verifier()
            .header(Timestamp::now().as_second(), &payload)?;

        let response = server
            .post("/api/webhook")
            .add_header(STRIPE_SIGNATURE_HEADER, signature)
            .bytes(payload.into())
            .await;
        response.assert_status_ok();
        assert!(response.json::<WebhookReceived>().received);

        let sent = providers.mail.sent().await;
        assert_eq!(sent.len(), 2);

        let admin = sent
            .iter()
            .find(|m| m.to == "ops@lore.example")
            .ok_or_else(|| anyhow::anyhow!("no admin message"))?;
        assert_eq!(admin.subject, "New Lore Purchase - OogieBoogie");
        assert!(admin.text.contains(LORE));
        assert!(admin.text.contains("Raw session id: cs_test_1"));

        let customer = sent
            .iter()
            .find(|m| m.to == "buyer@example.com")
            .ok_or_else(|| anyhow::anyhow!("no customer message"))?;
        assert_eq!(customer.subject, "Your personalized Lore - OogieBoogie");
        Ok(())
    }

    #[tokio::test]
    async fn other_events_are_ignored() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let payload = json!({
            "id": "evt_2",
            "type": "payment_intent.created",
            "data": { "object": {} },
        })
        .to_string()
        .into_bytes();
        let signature = providers
            .payment
            .verifier()
            .header(Timestamp::now().as_second(), &payload)?;

        let response = server
            .post("/api/webhook")
            .add_header(STRIPE_SIGNATURE_HEADER, signature)
            .bytes(payload.into())
            .await;
        response.assert_status_ok();
        assert!(providers.mail.sent().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let response = server
            .post("/api/webhook")
            .bytes(completed_event(lore_metadata()).into())
            .await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["name"],
            "missing_signature"
        );
        Ok(())
    }

    #[tokio::test]
    async fn forged_signature_is_rejected() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let payload = completed_event(lore_metadata());
        let signature = providers
            .payment
            .verifier()
            .header(Timestamp::now().as_second(), b"another body")?;

        let response = server
            .post("/api/webhook")
            .add_header(STRIPE_SIGNATURE_HEADER, signature)
            .bytes(payload.into())
            .await;
        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["name"],
            "invalid_signature"
        );
        assert!(providers.mail.sent().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn stale_signature_is_rejected() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let payload = completed_event(lore_metadata());
        let an_hour_ago = Timestamp::now().as_second() - 3600;
        let signature = providers.payment.verifier().header(an_hour_ago, &payload)?;

        let response = server
            .post("/api/webhook")
            .add_header(STRIPE_SIGNATURE_HEADER, signature)
            .bytes(payload.into())
            .await;
        assert_eq!(
            response.json::<serde_json::Value>()["name"],
            "invalid_signature"
        );
        Ok(())
    }
}
