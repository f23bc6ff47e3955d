//! OpenAI client configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default OpenAI API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Credentials and defaults of the completion API.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct OpenAiConfig {
    /// API key
    #[cfg_attr(
        feature = "config",
        arg(
            id = "openai_api_key",
            long = "openai-api-key",
            env = "OPENAI_API_KEY",
            hide_env_values = true,
        )
    )]
    pub api_key: String,

    /// API base URL; any OpenAI-compatible endpoint works
    #[cfg_attr(
        feature = "config",
        arg(
            id = "openai_api_url",
            long = "openai-api-url",
            env = "OPENAI_API_URL",
            default_value = DEFAULT_API_URL,
        )
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Chat model used for lore generation
    #[cfg_attr(
        feature = "config",
        arg(long = "openai-model", env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature between 0 and 2
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-temperature",
            env = "OPENAI_TEMPERATURE",
            default_value_t = DEFAULT_TEMPERATURE
        )
    )]
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("OPENAI_API_URL is invalid: {e}")))?;
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config("OPENAI_MODEL is empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "OPENAI_TEMPERATURE must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OpenAiConfig::new("sk-test");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.8);
        assert_eq!(
            config.endpoint("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation() {
        assert!(OpenAiConfig::new(" ").validate().is_err());
        assert!(OpenAiConfig::new("k").with_temperature(2.5).validate().is_err());
        assert!(OpenAiConfig::new("k").with_model("").validate().is_err());
        assert!(OpenAiConfig::new("k").with_api_url("not a url").validate().is_err());
    }
}
