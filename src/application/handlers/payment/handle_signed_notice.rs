//! HandleSignedNoticeHandler - Server-to-server payment notices.
//!
//! Providers post a signed notice when a payment succeeds or fails outside
//! the browser flow. A notice the provider API vouches for is turned into a
//! marketplace notification.

use std::collections::HashMap;
use std::sync::Arc;

use super::{DispatchOutcome, NotificationDispatcher};
use crate::domain::foundation::TransactionId;
use crate::domain::payment::Provider;
use crate::ports::ProviderClient;

const TRANSACTION_FIELD: &str = "ext_transaction_id";

/// Which callback endpoint received the notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// Command carrying a posted notice.
#[derive(Debug, Clone)]
pub struct HandleSignedNoticeCommand {
    pub kind: NoticeKind,
    /// The notice exactly as signed by the provider.
    pub signed_notice: String,
    /// Fields decoded from the notice.
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedNoticeResult {
    /// Notice accepted and the matching notification dispatched.
    Accepted {
        transaction_id: TransactionId,
        dispatch: DispatchOutcome,
    },
    /// Provider API did not vouch for the notice.
    Invalid,
    /// Notice was authentic but named no transaction.
    Incomplete,
}

pub struct HandleSignedNoticeHandler {
    provider: Provider,
    provider_client: Arc<dyn ProviderClient>,
    dispatcher: NotificationDispatcher,
}

impl HandleSignedNoticeHandler {
    pub fn new(
        provider: Provider,
        provider_client: Arc<dyn ProviderClient>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            provider,
            provider_client,
            dispatcher,
        }
    }

    pub async fn handle(&self, cmd: HandleSignedNoticeCommand) -> SignedNoticeResult {
        let kind = cmd.kind.as_str();

        match self
            .provider_client
            .create_notice(self.provider, &cmd.signed_notice)
            .await
        {
            Ok(result) if result.is_ok() => {
                tracing::info!(provider = %self.provider, kind, "Callback token was valid");
            }
            Ok(result) => {
                tracing::error!(
                    provider = %self.provider,
                    kind,
                    reason = result.reason.as_deref().unwrap_or(""),
                    "Callback token was invalid"
                );
                return SignedNoticeResult::Invalid;
            }
            Err(e) => {
                tracing::error!(provider = %self.provider, kind, error = %e, "Callback token check failed");
                return SignedNoticeResult::Invalid;
            }
        }

        let Some(transaction_id) = cmd
            .fields
            .get(TRANSACTION_FIELD)
            .and_then(|id| TransactionId::new(id.as_str()).ok())
        else {
            tracing::error!(provider = %self.provider, kind, fields = ?cmd.fields, "Callback token was incomplete");
            return SignedNoticeResult::Incomplete;
        };

        let dispatch = match cmd.kind {
            NoticeKind::Success => self.dispatcher.notify(&transaction_id).await,
            NoticeKind::Error => self.dispatcher.notify_chargeback(&transaction_id).await,
        };

        SignedNoticeResult::Accepted {
            transaction_id,
            dispatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::TransactionRecord;
    use crate::ports::{
        EnqueueResult, JobKind, JobQueue, NoticePayload, NoticeResult, NotificationJob,
        ProviderClientError, QueueError,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockProviderClient {
        valid: bool,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProviderClient for MockProviderClient {
        async fn confirm_notice(
            &self,
            _provider: Provider,
            _payload: NoticePayload,
        ) -> Result<NoticeResult, ProviderClientError> {
            Ok(NoticeResult::ok())
        }

        async fn create_notice(
            &self,
            _provider: Provider,
            signed_notice: &str,
        ) -> Result<NoticeResult, ProviderClientError> {
            self.seen.lock().unwrap().push(signed_notice.to_string());
            if self.valid {
                Ok(NoticeResult::ok())
            } else {
                Ok(NoticeResult::fail("signature mismatch"))
            }
        }

        async fn get_transaction(
            &self,
            _id: &TransactionId,
        ) -> Result<Option<TransactionRecord>, ProviderClientError> {
            Ok(None)
        }
    }

    struct MockJobQueue {
        jobs: Mutex<Vec<NotificationJob>>,
    }

    #[async_trait]
    impl JobQueue for MockJobQueue {
        async fn enqueue(&self, job: NotificationJob) -> Result<EnqueueResult, QueueError> {
            let id = job.id;
            self.jobs.lock().unwrap().push(job);
            Ok(EnqueueResult::Enqueued(id))
        }
    }

    fn handler(valid: bool) -> (HandleSignedNoticeHandler, Arc<MockProviderClient>, Arc<MockJobQueue>) {
        let client = Arc::new(MockProviderClient {
            valid,
            seen: Mutex::new(Vec::new()),
        });
        let queue = Arc::new(MockJobQueue {
            jobs: Mutex::new(Vec::new()),
        });
        let handler = HandleSignedNoticeHandler::new(
            Provider::Reference,
            client.clone(),
            NotificationDispatcher::new(queue.clone()),
        );
        (handler, client, queue)
    }

    fn cmd(kind: NoticeKind, notice: &str, fields: &[(&str, &str)]) -> HandleSignedNoticeCommand {
        HandleSignedNoticeCommand {
            kind,
            signed_notice: notice.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_success_notice_dispatches_payment() {
        let (handler, client, queue) = handler(true);

        let result = handler
            .handle(cmd(NoticeKind::Success, "ext_transaction_id=T1&sig=x", &[("ext_transaction_id", "T1")]))
            .await;

        assert!(matches!(result, SignedNoticeResult::Accepted { ref transaction_id, .. } if transaction_id.as_str() == "T1"));
        assert_eq!(client.seen.lock().unwrap()[0], "ext_transaction_id=T1&sig=x");
        assert_eq!(queue.jobs.lock().unwrap()[0].kind, JobKind::PaymentNotify);
    }

    #[tokio::test]
    async fn valid_error_notice_dispatches_chargeback() {
        let (handler, _, queue) = handler(true);

        handler
            .handle(cmd(NoticeKind::Error, "ext_transaction_id=T1", &[("ext_transaction_id", "T1")]))
            .await;

        assert_eq!(queue.jobs.lock().unwrap()[0].kind, JobKind::ChargebackNotify);
    }

    #[tokio::test]
    async fn invalid_notice_dispatches_nothing() {
        let (handler, _, queue) = handler(false);

        let result = handler
            .handle(cmd(NoticeKind::Success, "ext_transaction_id=T1", &[("ext_transaction_id", "T1")]))
            .await;

        assert_eq!(result, SignedNoticeResult::Invalid);
        assert!(queue.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notice_without_transaction_is_incomplete() {
        let (handler, _, queue) = handler(true);

        let result = handler.handle(cmd(NoticeKind::Success, "foo=bar", &[("foo", "bar")])).await;

        assert_eq!(result, SignedNoticeResult::Incomplete);
        assert!(queue.jobs.lock().unwrap().is_empty());
    }
}
