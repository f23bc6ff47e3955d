//! Errors raised while assembling the application state.
//!
//! Request handlers never see these: once [`ServiceState`] is built, every
//! failure is an HTTP [`handler::Error`] instead.
//!
//! [`ServiceState`]: crate::service::ServiceState
//! [`handler::Error`]: crate::handler::Error

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use lore_core::chunk::LimitsError;

/// Boxed error source, `Send + Sync` so errors can cross task boundaries.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for state assembly.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Category of a state assembly failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or inconsistent configuration values.
    Config,
    /// A provider could not be set up.
    Provider,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Provider => "provider",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State assembly error.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a provider error prefixed with the provider name.
    #[inline]
    pub fn provider(provider: &str, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Provider, format!("{provider}: {message}"))
    }

    /// Creates an internal error prefixed with the component name.
    #[inline]
    pub fn internal(component: &str, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Internal, format!("{component}: {message}"))
    }
}

impl From<LimitsError> for Error {
    fn from(error: LimitsError) -> Self {
        Error::config(format!("fragment limits: {error}")).with_source(error)
    }
}
