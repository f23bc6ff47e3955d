//! Hosted checkout sessions.
//!
//! The lore is written into the session metadata as numbered fragments so
//! the webhook and the fulfillment endpoint can rebuild it once the payment
//! settles, without any server-side storage.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use lore_core::chunk::{LoreCodec, MetadataCeiling};
use lore_service::PaymentService;
use lore_service::payment::CheckoutRequest;

use crate::extract::{Json, LoreHeader, RequestOrigin, ValidateJson};
use crate::handler::request::CreateCheckout;
use crate::handler::response::{CheckoutSessionCreated, ErrorResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{ProductCatalog, PublicOrigin, ServiceState};

/// Tracing target for checkout operations.
const TRACING_TARGET: &str = "lore_server::handler::checkout";

/// Placeholder the provider replaces with the session id on redirect.
const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Cuts `value` to the per-value metadata ceiling.
fn metadata_value(value: &str) -> String {
    value
        .trim()
        .chars()
        .take(MetadataCeiling::STRIPE.max_value_len)
        .collect()
}

/// Opens a hosted checkout carrying the lore in its metadata.
#[tracing::instrument(
    skip_all,
    fields(
        pseudo = %request.pseudo,
        product = ?request.product_type,
    )
)]
async fn create_checkout_session(
    State(payment): State<PaymentService>,
    State(codec): State<LoreCodec>,
    State(catalog): State<ProductCatalog>,
    State(public_origin): State<PublicOrigin>,
    origin: RequestOrigin,
    lore_header: LoreHeader,
    ValidateJson(request): ValidateJson<CreateCheckout>,
) -> Result<(StatusCode, Json<CheckoutSessionCreated>)> {
    tracing::debug!(target: TRACING_TARGET, "Creating checkout session");

    let Some(origin) = origin.or_fallback(public_origin.as_deref()) else {
        return Err(ErrorKind::BadRequest
            .with_message("Cannot determine the site origin")
            .with_resource("origin"));
    };

    let lore = request.lore_text(lore_header.as_deref());
    let encoded = codec.encode(lore);
    if encoded.is_truncated() {
        tracing::warn!(
            target: TRACING_TARGET,
            lore_len = encoded.original_len(),
            "Lore exceeds metadata capacity and was truncated"
        );
    }

    let checkout = CheckoutRequest::new(
        catalog.price_for(request.product_type),
        format!("{origin}/success?session_id={SESSION_ID_PLACEHOLDER}"),
        format!("{origin}/"),
    )
    .with_metadata("pseudo", metadata_value(&request.pseudo))
    .with_metadata("genre", metadata_value(&request.genre))
    .with_metadata("role", metadata_value(&request.role))
    .with_metadata_entries(encoded);

    let session = payment.create_checkout_session(&checkout).await?;

    tracing::info!(
        target: TRACING_TARGET,
        session_id = %session.id,
        metadata_keys = checkout.metadata.len(),
        "Checkout session created"
    );

    let created = CheckoutSessionCreated {
        id: session.id,
        url: session.url,
    };
    Ok((StatusCode::OK, Json(created)))
}

fn create_checkout_session_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create checkout session")
        .description(
            "Opens a hosted card checkout for one product. The lore is taken from \
             `loreRaw`, `lore`, the base64 `x-lore-b64` header or `loreDisplay`, in that \
             order, and stored in the session metadata.",
        )
        .response::<200, Json<CheckoutSessionCreated>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<502, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the checkout route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/api/checkout-session",
            post_with(create_checkout_session, create_checkout_session_docs),
        )
        .with_path_items(|item| item.tag("Checkout"))
}

#[cfg(test)]
mod tests {
    use axum::http::header::ORIGIN;
    use serde_json::json;

    use super::*;
    use crate::extract::LORE_B64_HEADER;
    use crate::handler::test::create_test_server_with_providers;
    use crate::service::MockProviders;

    #[tokio::test]
    async fn creates_a_session_with_encoded_lore() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({
            "pseudo": "Leviathan",
            "genre": "epic",
            "role": "top",
            "lore": "Wolf: Tell me lamb, who is Leviathan?",
        });
        let response = server
            .post("/api/checkout-session")
            .add_header(ORIGIN, "https://shop.example")
            .json(&request)
            .await;
        response.assert_status_ok();

        let created = response.json::<CheckoutSessionCreated>();
        assert!(created.id.starts_with("cs_test_"));
        assert!(created.url.is_some());

        let requests = providers.payment.requests().await;
        let checkout = &requests[0];
        assert_eq!(checkout.price_id, "price_bundle");
        assert_eq!(checkout.quantity, 1);
        assert_eq!(
            checkout.success_url,
            "https://shop.example/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(checkout.cancel_url, "https://shop.example/");
        assert_eq!(checkout.metadata["pseudo"], "Leviathan");
        assert_eq!(
            checkout.metadata["lore_1"],
            "Wolf: Tell me lamb, who is Leviathan?"
        );
        assert_eq!(checkout.metadata["lore_count"], "1");
        Ok(())
    }

    #[tokio::test]
    async fn long_lore_is_split_into_fragments() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let lore = "Lamb: ".repeat(200);
        let request = json!({ "pseudo": "Rowan", "loreRaw": lore, "productType": "image_only" });
        let response = server
            .post("/api/checkout-session")
            .add_header(ORIGIN, "https://lore.example/")
            .json(&request)
            .await;
        response.assert_status_ok();

        let requests = providers.payment.requests().await;
        let checkout = &requests[0];
        assert_eq!(checkout.price_id, "price_image");
        assert_eq!(checkout.cancel_url, "https://lore.example/");
        assert_eq!(checkout.metadata["lore_len"], "1200");
        assert_eq!(checkout.metadata["lore_count"], "3");
        assert!(
            checkout
                .metadata
                .values()
                .all(|value| value.chars().count() <= 500)
        );
        Ok(())
    }

    #[tokio::test]
    async fn header_copy_is_used_when_body_has_none() -> anyhow::Result<()> {
        let providers = MockProviders::default();
        let server = create_test_server_with_providers(|_| routes(), &providers)?;

        let request = json!({ "pseudo": "Chrispi", "loreDisplay": "display text" });
        let response = server
            .post("/api/checkout-session")
            .add_header(LORE_B64_HEADER, "V29sZjogVGVsbCBtZSBsYW1i")
            .json(&request)
            .await;
        response.assert_status_ok();

        let requests = providers.payment.requests().await;
        assert_eq!(requests[0].metadata["lore_1"], "Wolf: Tell me lamb");
        Ok(())
    }
}
