#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for chunk codec operations.
pub const TRACING_TARGET_CHUNK: &str = "lore_core::chunk";

pub mod chunk;
mod error;
mod health;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
