//! HTTP middleware settings.

use clap::Args;
use lore_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Credentialed CORS; the lore cache cookies need it.
    #[clap(flatten)]
    pub cors: CorsConfig,

    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_origins = ?self.cors.allowed_origins,
            cors_credentials = self.cors.allow_credentials,
            openapi_json = %self.openapi.open_api_json,
            scalar_ui = %self.openapi.scalar_ui,
            request_timeout_secs = self.recovery.request_timeout,
            "Middleware configured"
        );
    }
}
