//! Data transfer objects for the payment HTTP API.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::TransactionStatusView;
use crate::domain::payment::{Provider, TransactionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Form posted by a provider to the server-to-server callback endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedNoticeForm {
    /// Signed query string, e.g. `ext_transaction_id=T1&sig=...`.
    pub signed_notice: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /mozpay/provider/transaction/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionStatusResponse {
    pub status: TransactionStatus,
    pub provider: Provider,
}

impl From<TransactionStatusView> for TransactionStatusResponse {
    fn from(view: TransactionStatusView) -> Self {
        Self {
            status: view.status,
            provider: view.provider,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
