//! HTTP mail API client.
//!
//! Targets APIs that accept a JSON `{ from, to, subject, text }` body with
//! bearer authentication, such as Resend or Postmark-style gateways.

mod client;
mod config;

pub use client::MailApiClient;
pub use config::MailApiConfig;
