//! Provider API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::payment::Provider;

/// Provider API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API
    pub api_url: String,

    /// OAuth consumer key
    pub oauth_key: String,

    /// OAuth consumer secret
    pub oauth_secret: SecretString,

    /// Bound on every provider API call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Provider that signs notices posted to the callback endpoints
    #[serde(default = "default_provider")]
    pub default_provider: Provider,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_url.is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER_API_URL"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if self.oauth_key.is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER_OAUTH_KEY"));
        }
        if self.oauth_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER_OAUTH_SECRET"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            oauth_key: String::new(),
            oauth_secret: SecretString::new(String::new()),
            timeout_secs: default_timeout(),
            default_provider: default_provider(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_provider() -> Provider {
    Provider::Bango
}
