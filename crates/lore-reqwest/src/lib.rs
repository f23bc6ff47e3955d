//! Reqwest-based HTTP clients for the lore providers.
//!
//! # Example
//!
//! ```rust,ignore
//! use lore_reqwest::{ReqwestConfig, StripeClient, StripeConfig};
//!
//! let client = StripeClient::new(stripe_config, &ReqwestConfig::default())?;
//! let payments = client.into_service();
//! let session = payments.create_checkout_session(&request).await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod mail;
mod openai;
mod stripe;

pub use crate::config::{DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use crate::error::{Error, Result};
pub use crate::mail::{MailApiClient, MailApiConfig};
pub use crate::openai::{OpenAiClient, OpenAiConfig};
pub use crate::stripe::{StripeClient, StripeConfig};
