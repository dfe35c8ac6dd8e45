//! Provider callback values.

use std::collections::HashMap;

use crate::domain::foundation::TransactionId;

/// Which provider redirect endpoint received the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    /// The provider's "payment completed" redirect.
    Completion,
    /// The provider's "payment errored" redirect.
    Error,
}

/// A callback exactly as the provider delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCallback {
    pub kind: CallbackKind,
    /// Decoded query parameters.
    pub params: HashMap<String, String>,
    /// Undecoded query string, needed for signature checks.
    pub raw_query: String,
}

impl RawCallback {
    pub fn new(kind: CallbackKind, params: HashMap<String, String>, raw_query: impl Into<String>) -> Self {
        Self {
            kind,
            params,
            raw_query: raw_query.into(),
        }
    }

    /// Returns a parameter when present and non-empty.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Provider-neutral outcome of a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Ok,
    Cancelled,
    Error,
    Unsupported,
    UnknownCode,
}

/// Callback normalized by its provider adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCallback {
    pub transaction_id: Option<TransactionId>,
    pub outcome: CallbackOutcome,
    /// Provider parameters, kept for logging only.
    pub raw_detail: HashMap<String, String>,
}
