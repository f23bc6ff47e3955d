//! Fulfillment of paid sessions from the success page.
//!
//! The success page posts the session id it was redirected with, along with
//! the lore it still holds. Notifications go out once the provider confirms
//! the payment.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use lore_core::chunk::LoreCodec;
use lore_service::PaymentService;

use crate::extract::{Json, ValidateJson};
use crate::handler::request::Fulfill;
use crate::handler::response::{ErrorResponse, Fulfilled};
use crate::handler::{ErrorKind, Result};
use crate::service::{Notifier, Purchase, ServiceState};

/// Tracing target for fulfillment operations.
const TRACING_TARGET: &str = "lore_server::handler::fulfillment";

/// Returns `value` unless it is blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Mails the lore of a paid checkout session.
#[tracing::instrument(skip_all, fields(session_id = ?request.session_id()))]
async fn fulfill(
    State(payment): State<PaymentService>,
    State(codec): State<LoreCodec>,
    State(notifier): State<Notifier>,
    ValidateJson(request): ValidateJson<Fulfill>,
) -> Result<(StatusCode, Json<Fulfilled>)> {
    let Some(session_id) = request.session_id() else {
        return Err(ErrorKind::BadRequest
            .with_message("Missing session_id")
            .with_resource("session_id"));
    };

    let session = payment.retrieve_session(session_id).await?;
    if !session.is_paid() {
        tracing::warn!(
            target: TRACING_TARGET,
            payment_status = ?session.payment_status,
            "Fulfillment requested for an unpaid session"
        );
        return Err(ErrorKind::PaymentRequired.with_message("Session not paid"));
    }

    let decoded = codec.decode(&session.metadata);
    let stored = Purchase::from_session(&session).with_decoded(&decoded);

    let purchase = match request.lore() {
        Some(lore) => Purchase {
            lore,
            degraded_decode: None,
            ..stored
        },
        None if !decoded.text().trim().is_empty() => stored,
        None => {
            tracing::warn!(
                target: TRACING_TARGET,
                tier = %decoded.tier(),
                "No lore in the request or the session metadata"
            );
            return Err(ErrorKind::BadRequest
                .with_message("Missing lore text")
                .with_resource("lore"));
        }
    };

    let purchase = Purchase {
        pseudo: non_blank(request.pseudo.as_deref()).unwrap_or(purchase.pseudo),
        genre: non_blank(request.genre.as_deref()).unwrap_or(purchase.genre),
        role: non_blank(request.role.as_deref()).unwrap_or(purchase.role),
        customer_email: notifier.customer_address(&session),
        ..purchase
    };

    let report = notifier.dispatch(&purchase).await;
    tracing::info!(
        target: TRACING_TARGET,
        admin_delivered = report.admin,
        customer_delivered = ?report.customer,
        "Session fulfilled"
    );

    Ok((StatusCode::OK, Json(Fulfilled::default())))
}

fn fulfill_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Fulfill paid session")
        .description(
            "Checks that the checkout session is paid, then mails the lore to the \
             operator and the buyer. The lore and profile fields fall back to the \
             session metadata when the request leaves them empty.",
        )
        .response::<200, Json<Fulfilled>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<402, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<502, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with the fulfillment route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/fulfill", post_with(fulfill, fulfill_docs))
        .with_path_items(|item| item.tag("Checkout"))
}
