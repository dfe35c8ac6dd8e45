//! Single-page payment flow configuration

use serde::{Deserialize, Deserializer};

use super::error::ValidationError;
use crate::domain::payment::Provider;

/// SPA configuration
///
/// `enabled_urls` decides whether the SPA routes are mounted at all;
/// `enabled` decides whether mounted routes serve or answer 403.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub enabled_urls: bool,

    /// Providers whose callbacks are accepted. Either a list or a
    /// comma-separated string (`bango,reference`).
    #[serde(
        default = "default_supported_providers",
        deserialize_with = "deserialize_providers"
    )]
    pub supported_providers: Vec<Provider>,

    /// Static assets referenced by the SPA shell
    #[serde(default = "default_media_url")]
    pub media_url: String,
}

impl SpaConfig {
    pub fn supports(&self, provider: Provider) -> bool {
        self.supported_providers.contains(&provider)
    }

    /// Validate SPA configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.supported_providers.is_empty() {
            return Err(ValidationError::NoSupportedProviders);
        }
        Ok(())
    }
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enabled_urls: true,
            supported_providers: default_supported_providers(),
            media_url: default_media_url(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProviderList {
    Csv(String),
    List(Vec<Provider>),
}

fn deserialize_providers<'de, D>(deserializer: D) -> Result<Vec<Provider>, D::Error>
where
    D: Deserializer<'de>,
{
    match ProviderList::deserialize(deserializer)? {
        ProviderList::List(providers) => Ok(providers),
        ProviderList::Csv(names) => names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| name.parse().map_err(serde::de::Error::custom))
            .collect(),
    }
}

fn default_true() -> bool {
    true
}

fn default_supported_providers() -> Vec<Provider> {
    Provider::ALL.to_vec()
}

fn default_media_url() -> String {
    "/mozpay/media/".to_string()
}
