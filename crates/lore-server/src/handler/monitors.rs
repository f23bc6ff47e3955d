//! Health checks.
//!
//! `GET /api/health` asks every provider for its health concurrently and
//! answers with the worst status. Only an unhealthy provider turns the
//! response into `503 Service Unavailable`; a degraded one still serves.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use lore_service::{ServiceHealth, ServiceStatus};

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "lore_server::handler::monitors";

/// Turns a failed health check into an unhealthy report.
fn report(result: lore_service::Result<ServiceHealth>) -> ServiceHealth {
    result.unwrap_or_else(|error| ServiceHealth::unhealthy(error.to_string()))
}

fn status_code(status: ServiceStatus) -> StatusCode {
    match status {
        ServiceStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        ServiceStatus::Healthy | ServiceStatus::Degraded => StatusCode::OK,
    }
}

#[tracing::instrument(skip_all)]
async fn health_status(
    State(state): State<ServiceState>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    let (payment, mail, completion) = tokio::join!(
        state.payment.health_check(),
        state.mail.health_check(),
        state.completion.health_check(),
    );

    let health = ServiceHealth::aggregate([
        ("payment", report(payment)),
        ("mail", report(mail)),
        ("completion", report(completion)),
    ]);

    let status_code = status_code(health.status);
    if health.is_healthy() {
        tracing::debug!(target: TRACING_TARGET, "All providers healthy");
    } else {
        tracing::warn!(
            target: TRACING_TARGET,
            status = ?health.status,
            message = health.message.as_deref().unwrap_or_default(),
            "Provider health check failed"
        );
    }

    Ok((status_code, Json(MonitorStatus::new(health.status))))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get health status")
        .description("Checks the payment, mail and completion providers.")
        .response::<200, Json<MonitorStatus>>()
        .response::<503, Json<MonitorStatus>>()
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/api/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
