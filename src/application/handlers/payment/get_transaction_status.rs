//! GetTransactionStatusHandler - Status lookups for the polling flow.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, TransactionId};
use crate::domain::payment::{session_transaction, Provider, TransactionStatus, TRANS_ID_KEY};
use crate::ports::{ProviderClient, ProviderClientError, SessionStore};

#[derive(Debug, Clone)]
pub struct GetTransactionStatusQuery {
    pub session: Option<SessionId>,
    pub transaction_id: TransactionId,
}

/// Status answered to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionStatusView {
    pub status: TransactionStatus,
    pub provider: Provider,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionStatusError {
    #[error("Transaction not found")]
    NotFound,

    #[error("Provider API unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderClientError),
}

/// Answers the status of the session's own transaction.
///
/// A transaction other than the one in the session is reported as not
/// found, so one browser cannot look up another's payments.
pub struct GetTransactionStatusHandler {
    sessions: Arc<dyn SessionStore>,
    provider_client: Arc<dyn ProviderClient>,
}

impl GetTransactionStatusHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, provider_client: Arc<dyn ProviderClient>) -> Self {
        Self {
            sessions,
            provider_client,
        }
    }

    pub async fn handle(
        &self,
        query: GetTransactionStatusQuery,
    ) -> Result<TransactionStatusView, TransactionStatusError> {
        let session = query.session.ok_or(TransactionStatusError::NotFound)?;

        let owned = match self.sessions.get(&session, TRANS_ID_KEY).await {
            Ok(Some(value)) => session_transaction(&value).as_ref() == Some(&query.transaction_id),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session transaction");
                false
            }
        };
        if !owned {
            tracing::info!(
                transaction_id = %query.transaction_id,
                "Status requested for a transaction outside the session"
            );
            return Err(TransactionStatusError::NotFound);
        }

        let record = self
            .provider_client
            .get_transaction(&query.transaction_id)
            .await?
            .ok_or(TransactionStatusError::NotFound)?;

        Ok(TransactionStatusView {
            status: record.status,
            provider: record.provider,
        })
    }
}
