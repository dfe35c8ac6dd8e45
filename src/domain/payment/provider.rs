//! Payment provider adapters.
//!
//! Each provider speaks its own callback dialect. `Provider` turns those
//! dialects into a [`CanonicalCallback`] and knows how to ask the provider API
//! whether a callback is authentic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::{CallbackKind, CallbackOutcome, CanonicalCallback, DevMessage, RawCallback};
use crate::domain::foundation::{TransactionId, ValidationError};
use crate::ports::{NoticePayload, NoticeResult, ProviderClient, ProviderClientError};

/// Bango parameter carrying the transaction id.
const BANGO_TRANSACTION_PARAM: &str = "MerchantTransactionId";
/// Bango parameter carrying the response code.
const BANGO_RESPONSE_CODE_PARAM: &str = "ResponseCode";
const REFERENCE_TRANSACTION_PARAM: &str = "ext_transaction_id";
const BOKU_TRANSACTION_PARAM: &str = "param";

/// A payment provider webpay can hand a purchase to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Bango,
    Reference,
    Boku,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Bango, Provider::Reference, Provider::Boku];

    /// Lowercase name used in URLs and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Bango => "bango",
            Provider::Reference => "reference",
            Provider::Boku => "boku",
        }
    }

    /// Code reported when the provider signals a fatal error.
    pub fn fatal_error_code(&self) -> DevMessage {
        match self {
            Provider::Bango => DevMessage::BangoError,
            Provider::Reference | Provider::Boku => DevMessage::ExtError,
        }
    }

    /// One-shot providers settle on the redirect itself, so the session's
    /// transaction is finished once the redirect is reconciled.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Provider::Bango | Provider::Reference)
    }

    /// Polling providers redirect before settlement; the browser then polls
    /// the transaction status endpoint.
    pub fn uses_polling(&self) -> bool {
        matches!(self, Provider::Boku)
    }

    /// Whether the provider redirects failures to a dedicated error URL.
    pub fn accepts_error_callback(&self) -> bool {
        matches!(self, Provider::Bango | Provider::Reference)
    }

    /// Extracts the transaction id a provider put on its notice.
    pub fn transaction_from_notice(&self, params: &HashMap<String, String>) -> Option<TransactionId> {
        let key = match self {
            Provider::Bango => BANGO_TRANSACTION_PARAM,
            Provider::Reference => REFERENCE_TRANSACTION_PARAM,
            Provider::Boku => BOKU_TRANSACTION_PARAM,
        };
        params
            .get(key)
            .and_then(|value| TransactionId::new(value.as_str()).ok())
    }

    /// Normalizes a provider callback. Never fails; anything unrecognized
    /// becomes [`CallbackOutcome::UnknownCode`].
    pub fn parse_callback(&self, raw: &RawCallback) -> CanonicalCallback {
        let outcome = match self {
            Provider::Bango => bango_outcome(raw.kind, raw.param(BANGO_RESPONSE_CODE_PARAM)),
            Provider::Reference | Provider::Boku => match raw.kind {
                CallbackKind::Completion => CallbackOutcome::Ok,
                CallbackKind::Error => CallbackOutcome::Error,
            },
        };

        CanonicalCallback {
            transaction_id: self.transaction_from_notice(&raw.params),
            outcome,
            raw_detail: raw.params.clone(),
        }
    }

    /// Asks the provider API whether the callback is authentic.
    pub async fn confirm_notice(
        &self,
        client: &dyn ProviderClient,
        raw: &RawCallback,
    ) -> Result<NoticeResult, ProviderClientError> {
        let payload = match self {
            Provider::Bango => NoticePayload::Fields(raw.params.clone()),
            Provider::Reference | Provider::Boku => NoticePayload::RawQuery(raw.raw_query.clone()),
        };
        client.confirm_notice(*self, payload).await
    }
}

fn bango_outcome(kind: CallbackKind, code: Option<&str>) -> CallbackOutcome {
    match (kind, code) {
        (CallbackKind::Completion, Some("OK")) => CallbackOutcome::Ok,
        (_, Some("CANCEL")) => CallbackOutcome::Cancelled,
        (_, Some("NOT_SUPPORTED")) => CallbackOutcome::Unsupported,
        (_, Some("NOT_OK")) => CallbackOutcome::Error,
        _ => CallbackOutcome::UnknownCode,
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| ValidationError::UnknownProvider(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.trim().parse().map_err(serde::de::Error::custom)
    }
}
