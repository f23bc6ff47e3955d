//! OpenAI chat completions client.

mod client;
mod config;
mod wire;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
