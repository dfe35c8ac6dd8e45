//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `WEBPAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use webpay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod notification;
mod provider;
mod server;
mod session;
mod spa;

pub use error::{ConfigError, ValidationError};
pub use notification::NotificationConfig;
pub use provider::ProviderConfig;
pub use server::{Environment, ServerConfig};
pub use session::{SessionBackend, SessionConfig};
pub use spa::SpaConfig;

use serde::Deserialize;

/// Provider calls a single callback request may make: the notice check and
/// the transaction lookup fallback.
const PROVIDER_CALLS_PER_REQUEST: u32 = 2;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Provider API access (base URL, OAuth credentials)
    pub provider: ProviderConfig,

    /// SPA payment flow switches and supported providers
    #[serde(default)]
    pub spa: SpaConfig,

    /// Browser session storage
    #[serde(default)]
    pub session: SessionConfig,

    /// Marketplace notification delivery
    pub notification: NotificationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WEBPAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WEBPAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `WEBPAY__SPA__SUPPORTED_PROVIDERS=bango,reference` -> `spa.supported_providers`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed, including unknown provider names.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WEBPAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.provider.validate()?;
        self.spa.validate()?;
        self.session.validate()?;
        self.notification.validate()?;

        if self.provider.timeout() * PROVIDER_CALLS_PER_REQUEST >= self.server.request_timeout() {
            return Err(ValidationError::ProviderTimeoutExceedsRequest);
        }

        if !self.spa.supports(self.provider.default_provider) {
            return Err(ValidationError::DefaultProviderUnsupported(
                self.provider.default_provider.to_string(),
            ));
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
