//! JSON extractor that also runs `validator` rules.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::extract::TRACING_TARGET;
use crate::handler::{Error, ErrorKind};

/// Deserializes a JSON body, then validates it.
///
/// Validation failures become a single [`ErrorKind::BadRequest`] whose
/// message lists every offending field.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self::new(data))
    }
}

fn param(error: &ValidationError, name: &str) -> Option<u64> {
    error.params.get(name).and_then(serde_json::Value::as_u64)
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("Field '{field}': {message}");
    }

    match (error.code.as_ref(), param(error, "min"), param(error, "max")) {
        ("length", Some(1), None) => format!("Field '{field}' is required"),
        ("length", Some(1), Some(max)) => {
            format!("Field '{field}' is required and must be at most {max} characters long")
        }
        ("length", Some(min), Some(max)) => {
            format!("Field '{field}' must be between {min} and {max} characters long")
        }
        ("length", None, Some(max)) => {
            format!("Field '{field}' must be at most {max} characters long")
        }
        ("length", Some(min), None) => {
            format!("Field '{field}' must be at least {min} characters long")
        }
        (code, ..) => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| describe(field, error))
            })
            .collect();
        messages.sort();

        tracing::debug!(
            target: TRACING_TARGET,
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        let message = match messages.as_slice() {
            [] => "Validation failed".to_owned(),
            _ => messages.join(". "),
        };

        ErrorKind::BadRequest
            .with_message(message)
            .with_resource("request")
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Json::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    fn length_error(min: Option<u64>, max: Option<u64>) -> ValidationError {
        let mut error = ValidationError::new("length");
        if let Some(min) = min {
            error.add_param(Cow::Borrowed("min"), &min);
        }
        if let Some(max) = max {
            error.add_param(Cow::Borrowed("max"), &max);
        }
        error
    }

    #[test]
    fn required_field() {
        let message = describe("pseudo", &length_error(Some(1), Some(64)));
        assert_eq!(
            message,
            "Field 'pseudo' is required and must be at most 64 characters long"
        );
    }

    #[test]
    fn max_only() {
        let message = describe("genre", &length_error(None, Some(64)));
        assert_eq!(message, "Field 'genre' must be at most 64 characters long");
    }

    #[test]
    fn errors_become_bad_request() {
        let mut errors = ValidationErrors::new();
        errors.add("role", length_error(None, Some(64)));

        let error = Error::from(errors);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(
            error.message(),
            Some("Field 'role' must be at most 64 characters long")
        );
    }
}
