//! Browser session configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where session values live
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    Redis,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Cookie carrying the session id
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default)]
    pub backend: SessionBackend,

    /// Redis connection URL (redis backend only)
    pub redis_url: Option<String>,

    /// Idle lifetime of a session in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl SessionConfig {
    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let cookie_ok = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !cookie_ok {
            return Err(ValidationError::InvalidCookieName);
        }
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if self.backend == SessionBackend::Redis {
            let url = self
                .redis_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("SESSION_REDIS_URL"))?;
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            backend: SessionBackend::default(),
            redis_url: None,
            ttl_secs: default_ttl(),
        }
    }
}

fn default_cookie_name() -> String {
    "webpay_sessionid".to_string()
}

fn default_ttl() -> u64 {
    60 * 60 * 24
}
