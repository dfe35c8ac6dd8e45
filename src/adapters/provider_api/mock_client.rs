//! Mock provider API client for testing.
//!
//! Supports:
//! - Configurable notice verdicts
//! - Error injection per method
//! - Pre-loaded transaction records
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::TransactionId;
use crate::domain::payment::{Provider, TransactionRecord};
use crate::ports::{NoticePayload, NoticeResult, ProviderClient, ProviderClientError};

/// Mock provider API client.
///
/// # Example
///
/// ```ignore
/// let mock = MockProviderClient::new();
/// mock.set_confirm_error(ProviderClientError::from_status(400, "bad notice"));
/// mock.add_transaction(record);
/// ```
#[derive(Clone, Default)]
pub struct MockProviderClient {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Verdict returned by `confirm_notice`; OK when unset.
    confirm_result: Option<NoticeResult>,
    confirm_error: Option<ProviderClientError>,

    /// Verdict returned by `create_notice`; OK when unset.
    create_result: Option<NoticeResult>,
    create_error: Option<ProviderClientError>,

    transactions: HashMap<TransactionId, TransactionRecord>,
    lookup_error: Option<ProviderClientError>,

    call_log: Vec<MethodCall>,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodCall {
    ConfirmNotice(Provider, NoticePayload),
    CreateNotice(Provider, String),
    GetTransaction(TransactionId),
}

impl MockProviderClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_confirm_result(&self, result: NoticeResult) {
        self.state().confirm_result = Some(result);
    }

    pub fn set_confirm_error(&self, error: ProviderClientError) {
        self.state().confirm_error = Some(error);
    }

    pub fn set_create_result(&self, result: NoticeResult) {
        self.state().create_result = Some(result);
    }

    pub fn set_create_error(&self, error: ProviderClientError) {
        self.state().create_error = Some(error);
    }

    pub fn add_transaction(&self, record: TransactionRecord) {
        self.state().transactions.insert(record.uuid.clone(), record);
    }

    pub fn set_lookup_error(&self, error: ProviderClientError) {
        self.state().lookup_error = Some(error);
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    async fn confirm_notice(
        &self,
        provider: Provider,
        payload: NoticePayload,
    ) -> Result<NoticeResult, ProviderClientError> {
        let mut state = self.state();
        state.call_log.push(MethodCall::ConfirmNotice(provider, payload));
        if let Some(e) = state.confirm_error.clone() {
            return Err(e);
        }
        Ok(state.confirm_result.clone().unwrap_or_else(NoticeResult::ok))
    }

    async fn create_notice(
        &self,
        provider: Provider,
        signed_notice: &str,
    ) -> Result<NoticeResult, ProviderClientError> {
        let mut state = self.state();
        state
            .call_log
            .push(MethodCall::CreateNotice(provider, signed_notice.to_string()));
        if let Some(e) = state.create_error.clone() {
            return Err(e);
        }
        Ok(state.create_result.clone().unwrap_or_else(NoticeResult::ok))
    }

    async fn get_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRecord>, ProviderClientError> {
        let mut state = self.state();
        state.call_log.push(MethodCall::GetTransaction(id.clone()));
        if let Some(e) = state.lookup_error.clone() {
            return Err(e);
        }
        Ok(state.transactions.get(id).cloned())
    }
}
