//! Monitor response types.

use jiff::Timestamp;
use lore_core::ServiceStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregated health of the server and its providers.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// When the providers were checked.
    pub checked_at: Timestamp,
    /// Worst status reported by any provider.
    pub status: ServiceStatus,
    /// Application version.
    pub version: String,
}

impl MonitorStatus {
    pub fn new(status: ServiceStatus) -> Self {
        Self {
            checked_at: Timestamp::now(),
            status,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}
