use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON body of every error response.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// Stable machine-readable error name.
    pub name: Cow<'a, str>,
    /// Message safe to show to the buyer.
    pub message: Cow<'a, str>,
    /// Resource the error relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Hint for resolving the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Cow<'a, str>>,

    /// Internal context, logged but never serialized.
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data.",
        StatusCode::BAD_REQUEST,
    );
    pub const INVALID_SIGNATURE: Self = Self::new(
        "invalid_signature",
        "Webhook signature verification failed.",
        StatusCode::BAD_REQUEST,
    );
    pub const METHOD_NOT_ALLOWED: Self = Self::new(
        "method_not_allowed",
        "Method not allowed.",
        StatusCode::METHOD_NOT_ALLOWED,
    );
    pub const MISSING_SIGNATURE: Self = Self::new(
        "missing_signature",
        "Missing Stripe-Signature header.",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const PAYMENT_REQUIRED: Self = Self::new(
        "payment_required",
        "Payment required.",
        StatusCode::PAYMENT_REQUIRED,
    );
    pub const TOO_MANY_REQUESTS: Self = Self::new(
        "too_many_requests",
        "Rate limit exceeded.",
        StatusCode::TOO_MANY_REQUESTS,
    );

    // 5xx Server Errors
    pub const BAD_GATEWAY: Self = Self::new(
        "bad_gateway",
        "Upstream provider failed.",
        StatusCode::BAD_GATEWAY,
    );
    pub const GATEWAY_TIMEOUT: Self = Self::new(
        "gateway_timeout",
        "Request timed out.",
        StatusCode::GATEWAY_TIMEOUT,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const SERVICE_UNAVAILABLE: Self = Self::new(
        "service_unavailable",
        "Service unavailable.",
        StatusCode::SERVICE_UNAVAILABLE,
    );

    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            suggestion: None,
            context: None,
            status,
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the resource, joining with `/` when one is already present.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{existing}/{resource}")),
            None => resource,
        });
        self
    }

    /// Adds context, joining with `; ` when some is already present.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{existing}; {context}")),
            None => context,
        });
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<Cow<'a, str>>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                name = %self.name,
                message = %self.message,
                context = ?self.context,
                "HTTP error response"
            );
        } else {
            tracing::warn!(
                status = %self.status,
                name = %self.name,
                message = %self.message,
                resource = ?self.resource,
                context = ?self.context,
                "HTTP error response"
            );
        }
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_replaced() {
        let response = ErrorResponse::PAYMENT_REQUIRED.with_message("Session not paid");
        assert_eq!(response.message, "Session not paid");
    }

    #[test]
    fn resource_and_context_merge() {
        let response = ErrorResponse::NOT_FOUND
            .with_resource("cache")
            .with_resource("lore")
            .with_context("cookie missing")
            .with_context("no fallback");

        assert_eq!(response.resource.as_deref(), Some("cache/lore"));
        assert_eq!(
            response.context.as_deref(),
            Some("cookie missing; no fallback")
        );
    }

    #[test]
    fn serialization_skips_internal_fields() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_message("Missing lore text")
            .with_context("metadata tier absent")
            .with_suggestion("Send the lore in the request body");

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["name"], "bad_request");
        assert_eq!(json["message"], "Missing lore text");
        assert_eq!(json["suggestion"], "Send the lore in the request body");
        assert!(json.get("context").is_none());
        assert!(json.get("status").is_none());
        assert!(json.get("resource").is_none());
        Ok(())
    }
}
