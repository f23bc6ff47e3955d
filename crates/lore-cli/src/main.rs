#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use lore_server::handler::routes;
use lore_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
    SecurityHeadersConfig,
};
use lore_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "lore_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "lore_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "lore_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli)?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Builds the provider clients and the service state.
fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let services = cli
        .providers
        .create_services()
        .context("failed to create provider clients")?;

    let service_config = cli
        .service
        .clone()
        .into_server_config()
        .context("invalid service configuration")?;

    ServiceState::new(
        service_config,
        services.payment,
        services.mail,
        services.completion,
    )
    .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost): catches panics and enforces timeouts
/// 2. Observability: request IDs and tracing spans
/// 3. Security: CORS, security headers, body limit
/// 4. Routes (innermost) with the OpenAPI document
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let api_routes: Router = routes()
        .with_open_api(middleware.openapi.clone())
        .with_state(state);

    api_routes
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&middleware.recovery)
}
