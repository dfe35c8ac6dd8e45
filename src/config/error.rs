//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Server host {0} is not an IP address")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid provider API URL")]
    InvalidProviderUrl,

    #[error("Invalid marketplace notification URL")]
    InvalidMarketplaceUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("No supported payment providers configured")]
    NoSupportedProviders,

    #[error("Provider timeout leaves no room within the request timeout")]
    ProviderTimeoutExceedsRequest,

    #[error("Default provider {0} is not a supported provider")]
    DefaultProviderUnsupported(String),

    #[error("Invalid session cookie name")]
    InvalidCookieName,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Notification attempts must be between 1 and 50")]
    InvalidMaxAttempts,
}
