//! CallbackReconciler - Decides what a provider redirect means for the user's payment.
//!
//! A redirect from a provider is untrusted input. Before anything is settled
//! the provider API must vouch for the notice and the transaction it names
//! must be the one active in the user's session.

use std::sync::Arc;
use std::time::Duration;

use super::{DispatchOutcome, NotificationDispatcher};
use crate::domain::foundation::{SessionId, StateMachine, TransactionId};
use crate::domain::payment::{
    CallbackOutcome, DevMessage, FailureTarget, Provider, RawCallback, ReconciliationState,
    session_transaction, TransactionNotes, NOTES_KEY, TRANS_ID_KEY,
};
use crate::ports::{ProviderClient, SessionStore};

/// Command to reconcile one provider redirect.
#[derive(Debug, Clone)]
pub struct ReconcileCallbackCommand {
    pub provider: Provider,
    /// Browser session the redirect arrived with, if any.
    pub session: Option<SessionId>,
    pub callback: RawCallback,
}

/// Final decision for a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Payment accepted and the marketplace notification dispatched.
    Settled {
        transaction_id: TransactionId,
        dispatch: DispatchOutcome,
    },
    /// Payment not accepted; the user is sent to the failure page.
    Rejected(FailureTarget),
}

/// Handler reconciling provider redirects against the session.
pub struct CallbackReconciler {
    sessions: Arc<dyn SessionStore>,
    provider_client: Arc<dyn ProviderClient>,
    dispatcher: NotificationDispatcher,
    provider_timeout: Duration,
}

impl CallbackReconciler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        provider_client: Arc<dyn ProviderClient>,
        dispatcher: NotificationDispatcher,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            provider_client,
            dispatcher,
            provider_timeout,
        }
    }

    /// Reconciles a callback. Never fails: every problem becomes a
    /// [`ReconcileOutcome::Rejected`] with a classified code.
    pub async fn handle(&self, cmd: ReconcileCallbackCommand) -> ReconcileOutcome {
        let provider = cmd.provider;
        let state = ReconciliationState::Pending;
        let canonical = provider.parse_callback(&cmd.callback);

        // 1. Authenticity
        if let Err(code) = self.confirm(provider, &cmd.callback).await {
            return reject(state, provider, code);
        }

        // 2. Transaction id present
        let Some(transaction_id) = canonical.transaction_id else {
            tracing::info!(provider = %provider, "Callback did not carry a transaction id");
            return reject(state, provider, DevMessage::TransMissing);
        };

        // 3 and 4. Session match
        match self.active_transaction(cmd.session.as_ref()).await {
            Some(active) if active != transaction_id => {
                tracing::info!(
                    provider = %provider,
                    transaction_id = %transaction_id,
                    "Callback transaction is not the active transaction in the session"
                );
                return reject(state, provider, DevMessage::NoActiveTrans);
            }
            Some(_) => {}
            None => {
                if !self.known_to_provider(&transaction_id).await {
                    tracing::info!(
                        provider = %provider,
                        transaction_id = %transaction_id,
                        "No active transaction in the session and none pending upstream"
                    );
                    return reject(state, provider, DevMessage::NoActiveTrans);
                }
            }
        }
        let state = advance(state, ReconciliationState::Recorded);

        // 5 to 9. Outcome
        let classified = match canonical.outcome {
            CallbackOutcome::Ok => Ok(()),
            CallbackOutcome::Cancelled => {
                tracing::info!(provider = %provider, transaction_id = %transaction_id, "User cancelled payment");
                Err(DevMessage::UserCancelled)
            }
            CallbackOutcome::Unsupported => {
                tracing::warn!(provider = %provider, transaction_id = %transaction_id, "Payment method not supported");
                Err(DevMessage::UnsupportedPay)
            }
            CallbackOutcome::UnknownCode => {
                tracing::error!(
                    provider = %provider,
                    transaction_id = %transaction_id,
                    detail = ?canonical.raw_detail,
                    "Unexpected provider response code"
                );
                Err(DevMessage::BadBangoCode)
            }
            CallbackOutcome::Error => {
                tracing::error!(
                    provider = %provider,
                    transaction_id = %transaction_id,
                    detail = ?canonical.raw_detail,
                    "Fatal provider error"
                );
                Err(provider.fatal_error_code())
            }
        };

        if provider.is_one_shot() {
            self.finish_session(cmd.session.as_ref()).await;
        }

        match classified {
            Ok(()) => {
                advance(state, ReconciliationState::Settled);
                if let Some(notes) = self.notes(cmd.session.as_ref()).await {
                    tracing::info!(
                        provider = %provider,
                        transaction_id = %transaction_id,
                        issuer_key = %notes.issuer_key,
                        "Payment settled"
                    );
                } else {
                    tracing::info!(provider = %provider, transaction_id = %transaction_id, "Payment settled");
                }
                let dispatch = self.dispatcher.notify(&transaction_id).await;
                ReconcileOutcome::Settled {
                    transaction_id,
                    dispatch,
                }
            }
            Err(code) => reject(state, provider, code),
        }
    }

    async fn confirm(&self, provider: Provider, callback: &RawCallback) -> Result<(), DevMessage> {
        let client = self.provider_client.as_ref();
        let result = tokio::time::timeout(self.provider_timeout, provider.confirm_notice(client, callback)).await;

        match result {
            Ok(Ok(notice)) if notice.is_ok() => Ok(()),
            Ok(Ok(notice)) => {
                tracing::warn!(
                    provider = %provider,
                    reason = notice.reason.as_deref().unwrap_or(""),
                    "Provider did not confirm notice"
                );
                Err(DevMessage::NoticeError)
            }
            Ok(Err(e)) if e.is_client_error() => {
                tracing::warn!(provider = %provider, error = %e, "Provider refused notice check");
                Err(DevMessage::NoticeError)
            }
            Ok(Err(e)) => {
                tracing::error!(provider = %provider, error = %e, "Notice check failed");
                Err(DevMessage::NoticeException)
            }
            Err(_) => {
                tracing::error!(
                    provider = %provider,
                    timeout_ms = self.provider_timeout.as_millis() as u64,
                    "Notice check timed out"
                );
                Err(DevMessage::NoticeException)
            }
        }
    }

    /// Transaction id stored in the session. Unreadable sessions count as empty.
    async fn active_transaction(&self, session: Option<&SessionId>) -> Option<TransactionId> {
        let session = session?;
        match self.sessions.get(session, TRANS_ID_KEY).await {
            Ok(Some(value)) => session_transaction(&value),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session transaction");
                None
            }
        }
    }

    /// Fallback for redirects arriving without a session transaction.
    async fn known_to_provider(&self, transaction_id: &TransactionId) -> bool {
        let lookup = tokio::time::timeout(
            self.provider_timeout,
            self.provider_client.get_transaction(transaction_id),
        )
        .await;

        match lookup {
            Ok(Ok(Some(record))) => record.status.accepts_unmatched_callback(),
            Ok(Ok(None)) => false,
            Ok(Err(e)) => {
                tracing::warn!(transaction_id = %transaction_id, error = %e, "Transaction lookup failed");
                false
            }
            Err(_) => {
                tracing::warn!(transaction_id = %transaction_id, "Transaction lookup timed out");
                false
            }
        }
    }

    async fn notes(&self, session: Option<&SessionId>) -> Option<TransactionNotes> {
        let value = self.sessions.get(session?, NOTES_KEY).await.ok()??;
        serde_json::from_value(value).ok()
    }

    async fn finish_session(&self, session: Option<&SessionId>) {
        let Some(session) = session else { return };
        if let Err(e) = self.sessions.delete(session, TRANS_ID_KEY).await {
            tracing::error!(error = %e, "Failed to clear session transaction");
        }
    }
}

fn advance(from: ReconciliationState, to: ReconciliationState) -> ReconciliationState {
    from.transition_to(to).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Illegal reconciliation transition");
        to
    })
}

fn reject(state: ReconciliationState, provider: Provider, code: DevMessage) -> ReconcileOutcome {
    advance(state, ReconciliationState::Rejected);
    ReconcileOutcome::Rejected(FailureTarget::new(provider, code))
}
