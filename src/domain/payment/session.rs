//! Transaction session stored server side for each browser session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::TransactionId;

/// Session key holding the active transaction id.
pub const TRANS_ID_KEY: &str = "trans_id";

/// Session key holding issuer and pay request metadata.
pub const NOTES_KEY: &str = "notes";

/// Reads the transaction id stored under [`TRANS_ID_KEY`], normalized the
/// same way as ids arriving on callbacks. Anything but a valid string id
/// counts as no transaction.
pub fn session_transaction(value: &Value) -> Option<TransactionId> {
    value.as_str().and_then(|id| TransactionId::new(id).ok())
}

/// Metadata stored under [`NOTES_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionNotes {
    pub issuer_key: String,
    /// The signed pay request that started the purchase.
    pub pay_request: Value,
}
