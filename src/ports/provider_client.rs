//! Provider client port for the payment provider API.
//!
//! The provider API fronts every payment provider. Webpay uses it to check
//! that a notice really came from the provider and to look transactions up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::TransactionId;
use crate::domain::payment::{Provider, TransactionRecord};

/// Port for the provider API.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Ask whether a redirect notice is authentic.
    async fn confirm_notice(
        &self,
        provider: Provider,
        payload: NoticePayload,
    ) -> Result<NoticeResult, ProviderClientError>;

    /// Validate a signed server-to-server notice token.
    async fn create_notice(
        &self,
        provider: Provider,
        signed_notice: &str,
    ) -> Result<NoticeResult, ProviderClientError>;

    /// Look a transaction up by id. `Ok(None)` when the API does not know it.
    async fn get_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRecord>, ProviderClientError>;
}

/// What a provider needs to check a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticePayload {
    /// Decoded query fields.
    Fields(HashMap<String, String>),
    /// The query string exactly as received, for signature checks.
    RawQuery(String),
}

/// Provider API verdict on a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoticeVerdict {
    Ok,
    Fail,
}

/// Result of a notice check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeResult {
    #[serde(rename = "result")]
    pub verdict: NoticeVerdict,

    /// Explanation given by the provider on failure.
    #[serde(default)]
    pub reason: Option<String>,
}

impl NoticeResult {
    pub fn ok() -> Self {
        Self {
            verdict: NoticeVerdict::Ok,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            verdict: NoticeVerdict::Fail,
            reason: Some(reason.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.verdict == NoticeVerdict::Ok
    }
}

/// Provider API errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderClientError {
    #[error("Provider API timed out")]
    Timeout,

    #[error("Provider API unreachable: {0}")]
    Connection(String),

    #[error("Provider API rejected the request ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Provider API failed ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Provider API response could not be decoded: {0}")]
    Decode(String),
}

impl ProviderClientError {
    /// Builds the error matching an unsuccessful HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if (400..500).contains(&status) {
            ProviderClientError::Client { status, message }
        } else {
            ProviderClientError::Server { status, message }
        }
    }

    /// True when the API understood the request and refused it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ProviderClientError::Client { .. })
    }
}
