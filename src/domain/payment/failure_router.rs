//! Maps classified payment errors to the failure page.

use super::{DevMessage, Provider};

/// A failure page for one provider and error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureTarget {
    pub provider: Provider,
    pub code: DevMessage,
}

impl FailureTarget {
    pub fn new(provider: Provider, code: DevMessage) -> Self {
        Self { provider, code }
    }

    /// Path of the failure page, relative to the site root.
    pub fn path(&self) -> String {
        format!(
            "/mozpay/spa/provider/{}/payment-failure/{}",
            self.provider.name(),
            self.code.as_str()
        )
    }
}

/// Resolves `(provider name, error code)` pairs to failure pages for the
/// configured set of providers.
#[derive(Debug, Clone)]
pub struct FailureRouter {
    supported: Vec<Provider>,
}

impl FailureRouter {
    pub fn new(supported: impl IntoIterator<Item = Provider>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
        }
    }

    /// Returns the configured provider with this name, if any.
    pub fn provider(&self, name: &str) -> Option<Provider> {
        let provider = name.parse::<Provider>().ok()?;
        self.supported.contains(&provider).then_some(provider)
    }

    /// Returns `None` for unsupported provider names and for codes outside
    /// [`DevMessage`].
    pub fn route(&self, provider_name: &str, error_code: &str) -> Option<FailureTarget> {
        let provider = self.provider(provider_name)?;
        let code = error_code.parse::<DevMessage>().ok()?;
        Some(FailureTarget::new(provider, code))
    }
}
