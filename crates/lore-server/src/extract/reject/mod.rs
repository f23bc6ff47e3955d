//! Drop-in replacements for `axum` body extractors whose rejections are
//! converted into handler [`Error`]s.
//!
//! [`Error`]: crate::handler::Error

pub mod enhanced_json;
pub mod validated_json;

pub use self::enhanced_json::Json;
pub use self::validated_json::ValidateJson;
