//! PollForCompletionHandler - Completion flow for providers that settle after the redirect.

use crate::domain::foundation::TransactionId;
use crate::domain::payment::{Provider, RawCallback};

/// Query for a polling provider's completion redirect.
#[derive(Debug, Clone)]
pub struct PollForCompletionQuery {
    pub provider: Provider,
    pub callback: RawCallback,
}

/// Where the browser should poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    pub transaction_id: TransactionId,
    pub status_url: String,
}

/// Points the browser at the status endpoint of the transaction named by the
/// redirect. Nothing is settled here; settlement arrives server to server.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollForCompletionHandler;

impl PollForCompletionHandler {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when the redirect names no transaction.
    pub fn handle(&self, query: &PollForCompletionQuery) -> Option<PollTarget> {
        let Some(transaction_id) = query.provider.transaction_from_notice(&query.callback.params) else {
            tracing::info!(
                provider = %query.provider,
                query = %query.callback.raw_query,
                "No transaction found on polling redirect"
            );
            return None;
        };

        Some(PollTarget {
            status_url: transaction_status_url(&transaction_id),
            transaction_id,
        })
    }
}

/// Path of the status endpoint for a transaction.
pub fn transaction_status_url(transaction_id: &TransactionId) -> String {
    format!(
        "/mozpay/provider/transaction/{}/status",
        encode_path_segment(transaction_id.as_str())
    )
}

fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
