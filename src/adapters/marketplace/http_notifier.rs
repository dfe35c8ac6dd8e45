//! HTTP marketplace notifier.
//!
//! Posts `{"transaction_id": ..., "kind": ...}` to the marketplace
//! notification URL. Any non-2xx answer is a failed delivery.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::ports::{JobKind, MarketplaceNotifier, NotificationJob, NotifyError};

#[derive(Serialize)]
struct NotificationBody<'a> {
    transaction_id: &'a str,
    kind: JobKind,
}

/// reqwest-backed `MarketplaceNotifier`.
pub struct HttpMarketplaceNotifier {
    url: String,
    http_client: reqwest::Client,
}

impl HttpMarketplaceNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Connection(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl MarketplaceNotifier for HttpMarketplaceNotifier {
    async fn notify(&self, job: &NotificationJob) -> Result<(), NotifyError> {
        let body = NotificationBody {
            transaction_id: job.transaction_id.as_str(),
            kind: job.kind,
        };

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout
                } else {
                    NotifyError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
