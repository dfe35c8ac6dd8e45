//! HTTP client for the payment provider API.
//!
//! Implements the `ProviderClient` port against the provider API over JSON.
//!
//! # Endpoints
//!
//! - `POST {api_url}/bango/notification/` - Bango redirect fields
//! - `POST {api_url}/provider/{name}/notices/` - `{"qs": ...}` query string checks
//! - `GET {api_url}/generic/transaction/{id}/` - Transaction lookup
//!
//! # Security
//!
//! - Requests carry the OAuth key and secret as basic credentials
//! - Secrets are held as `secrecy::SecretString`

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::domain::foundation::TransactionId;
use crate::domain::payment::{Provider, TransactionRecord};
use crate::ports::{NoticePayload, NoticeResult, ProviderClient, ProviderClientError};

/// Provider API client configuration.
#[derive(Clone)]
pub struct ProviderApiConfig {
    /// Base URL of the provider API, without trailing slash.
    api_url: String,

    oauth_key: String,

    oauth_secret: SecretString,

    /// Upper bound for a whole request.
    timeout: Duration,
}

impl ProviderApiConfig {
    pub fn new(api_url: impl Into<String>, oauth_key: impl Into<String>, oauth_secret: SecretString) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            oauth_key: oauth_key.into(),
            oauth_secret,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed provider API client.
pub struct HttpProviderClient {
    config: ProviderApiConfig,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct QueryStringNotice<'a> {
    qs: &'a str,
}

impl HttpProviderClient {
    pub fn new(config: ProviderApiConfig) -> Result<Self, ProviderClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderClientError::Connection(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, ProviderClientError> {
        let mut url = reqwest::Url::parse(&self.config.api_url)
            .map_err(|e| ProviderClientError::Connection(format!("invalid provider API url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderClientError::Connection("provider API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: reqwest::Url,
        body: &B,
    ) -> Result<reqwest::Response, ProviderClientError> {
        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.config.oauth_key, Some(self.config.oauth_secret.expose_secret()))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        ensure_success(response).await
    }

    async fn post_query_string(
        &self,
        provider: Provider,
        qs: &str,
    ) -> Result<NoticeResult, ProviderClientError> {
        let url = self.url(&["provider", provider.name(), "notices"])?;
        let response = self.post_json(url, &QueryStringNotice { qs }).await?;
        response
            .json::<NoticeResult>()
            .await
            .map_err(|e| ProviderClientError::Decode(e.to_string()))
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderClientError {
    if e.is_timeout() {
        ProviderClientError::Timeout
    } else if e.is_decode() {
        ProviderClientError::Decode(e.to_string())
    } else {
        ProviderClientError::Connection(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), error = %error_text, "Provider API request failed");
    Err(ProviderClientError::from_status(status.as_u16(), error_text))
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn confirm_notice(
        &self,
        provider: Provider,
        payload: NoticePayload,
    ) -> Result<NoticeResult, ProviderClientError> {
        match payload {
            NoticePayload::Fields(fields) => {
                // Bango answers 2xx for a valid signature and 4xx otherwise.
                let url = self.url(&["bango", "notification"])?;
                self.post_json(url, &fields).await?;
                Ok(NoticeResult::ok())
            }
            NoticePayload::RawQuery(qs) => self.post_query_string(provider, &qs).await,
        }
    }

    async fn create_notice(
        &self,
        provider: Provider,
        signed_notice: &str,
    ) -> Result<NoticeResult, ProviderClientError> {
        self.post_query_string(provider, signed_notice).await
    }

    async fn get_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<TransactionRecord>, ProviderClientError> {
        let url = self.url(&["generic", "transaction", id.as_str()])?;

        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.config.oauth_key, Some(self.config.oauth_secret.expose_secret()))
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = ensure_success(response)
            .await?
            .json::<TransactionRecord>()
            .await
            .map_err(|e| ProviderClientError::Decode(e.to_string()))?;
        Ok(Some(record))
    }
}
