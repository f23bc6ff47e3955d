//! Stripe REST client.

mod client;
mod config;
mod form;

pub use client::StripeClient;
pub use config::StripeConfig;
