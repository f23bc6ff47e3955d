//! Common error type definitions.

use std::time::Duration;

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that payment, mail and completion providers report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// Network-related error occurred.
    NetworkError,
    /// The provider rejected our credentials or signature.
    Authentication,
    /// Rate limit exceeded.
    RateLimited,
    /// Service temporarily unavailable.
    ServiceUnavailable,
    /// Internal error.
    InternalError,
    /// The provider answered with an unexpected failure.
    ExternalError,
    /// Configuration error.
    Configuration,
    /// Resource not found.
    NotFound,
    /// Timeout occurred.
    Timeout,
    /// Serialization/deserialization error.
    Serialization,
    /// Unknown error occurred.
    Unknown,
}

/// A structured error type for lore providers.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    pub fn rate_limited() -> Self {
        Self::new(ErrorKind::RateLimited)
    }

    pub fn service_unavailable() -> Self {
        Self::new(ErrorKind::ServiceUnavailable)
    }

    pub fn internal_error() -> Self {
        Self::new(ErrorKind::InternalError)
    }

    pub fn external_error() -> Self {
        Self::new(ErrorKind::ExternalError)
    }

    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    pub fn unknown() -> Self {
        Self::new(ErrorKind::Unknown)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if the caller sent something the provider refused.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidInput | ErrorKind::NotFound | ErrorKind::RateLimited
        )
    }

    /// Returns true if the failure sits on the provider side or in our setup.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error() && self.kind != ErrorKind::NetworkError
    }

    /// Returns true if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NetworkError
                | ErrorKind::RateLimited
                | ErrorKind::ServiceUnavailable
                | ErrorKind::Timeout
        )
    }

    /// Returns the recommended retry delay for this error.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self.kind {
            ErrorKind::RateLimited => Some(Duration::from_secs(60)),
            ErrorKind::ServiceUnavailable => Some(Duration::from_secs(30)),
            ErrorKind::NetworkError => Some(Duration::from_secs(5)),
            ErrorKind::Timeout => Some(Duration::from_secs(10)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization().with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let error = Error::timeout().with_message("stripe did not answer");
        assert_eq!(error.to_string(), "Timeout: stripe did not answer");

        let error = Error::not_found();
        assert_eq!(error.to_string(), "NotFound");
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        assert_eq!(ErrorKind::RateLimited.as_ref(), "rate_limited");
        let name: &'static str = ErrorKind::ServiceUnavailable.into();
        assert_eq!(name, "service_unavailable");
    }

    #[test]
    fn classification() {
        assert!(Error::invalid_input().is_client_error());
        assert!(Error::external_error().is_server_error());
        assert!(!Error::network_error().is_server_error());
        assert!(Error::rate_limited().is_retryable());
        assert!(!Error::authentication().is_retryable());
        assert_eq!(
            Error::timeout().retry_delay(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn serde_errors_convert() {
        let error: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(error.kind(), ErrorKind::Serialization);
        assert!(std::error::Error::source(&error).is_some());
    }
}
