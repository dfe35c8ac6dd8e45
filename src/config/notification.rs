//! Marketplace notification configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Notification delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Marketplace endpoint receiving payment notifications
    pub marketplace_url: String,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl NotificationConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.marketplace_url.is_empty() {
            return Err(ValidationError::MissingRequired("NOTIFICATION_MARKETPLACE_URL"));
        }
        if !self.marketplace_url.starts_with("http://") && !self.marketplace_url.starts_with("https://") {
            return Err(ValidationError::InvalidMarketplaceUrl);
        }
        if self.max_attempts == 0 || self.max_attempts > 50 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            marketplace_url: String::new(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    300
}

fn default_timeout() -> u64 {
    10
}
