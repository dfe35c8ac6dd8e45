//! Transaction record as reported by the provider API.

use serde::{Deserialize, Serialize};

use super::Provider;
use crate::domain::foundation::TransactionId;

/// Lifecycle status of a transaction on the provider API side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Checked,
    Received,
    Failed,
    Cancelled,
    Errored,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Returns true once the transaction can no longer change.
    pub fn is_ended(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed
                | TransactionStatus::Checked
                | TransactionStatus::Failed
                | TransactionStatus::Cancelled
                | TransactionStatus::Errored
        )
    }

    /// Statuses under which a callback may be reconciled without a session
    /// transaction to compare against.
    pub fn accepts_unmatched_callback(&self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Completed)
    }
}

/// Server-side view of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub uuid: TransactionId,
    pub status: TransactionStatus,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_url: Option<String>,
}
