//! Health reports for external providers.
//!
//! Each provider answers a health check with a [`ServiceHealth`]. The server
//! folds them together with [`ServiceHealth::aggregate`] so a single unhealthy
//! dependency marks the whole service as unavailable.

use std::collections::HashMap;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents the operational status of a service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is operating normally
    #[default]
    Healthy,
    /// Service is operating with some issues but still functional
    Degraded,
    /// Service is not operational
    Unhealthy,
}

/// Health information for a service.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current service status
    pub status: ServiceStatus,
    /// Response time for the health check
    pub response: Option<Duration>,
    /// Optional message describing the current state
    pub message: Option<String>,
    /// Timestamp when the health check was performed
    pub checked_at: Timestamp,
    /// Additional metrics about the service
    pub metrics: HashMap<String, Value>,
}

impl ServiceHealth {
    /// Creates a new healthy service health report.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates a new degraded service health report.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Degraded,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Creates a new unhealthy service health report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Sets the response time for this health check.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    /// Adds a metric to the health report.
    pub fn with_metric(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    /// Returns true if the status is [`ServiceStatus::Healthy`].
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }

    /// Folds named reports into one, keeping the worst status.
    ///
    /// Each input becomes a `<name>` metric holding its status, and the
    /// messages of non-healthy inputs are joined into the combined message.
    pub fn aggregate<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, ServiceHealth)>,
    {
        let mut combined = Self::healthy();
        let mut messages = Vec::new();

        for (name, report) in reports {
            combined.status = combined.status.max(report.status);
            combined
                .metrics
                .insert(name.to_owned(), serde_json::json!(report.status));

            if report.status != ServiceStatus::Healthy {
                let message = report.message.as_deref().unwrap_or("no details");
                messages.push(format!("{name}: {message}"));
            }
        }

        if !messages.is_empty() {
            combined.message = Some(messages.join("; "));
        }

        combined
    }
}
