//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to the payment command/query handlers.
//! Browser-facing callbacks always answer with the SPA shell or a redirect to
//! the failure page; provider failures never surface as 5xx.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Json, Path, Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payment::{
    CallbackReconciler, GetTransactionStatusHandler, GetTransactionStatusQuery,
    HandleSignedNoticeCommand, HandleSignedNoticeHandler, NotificationDispatcher, NoticeKind,
    PollForCompletionHandler, PollForCompletionQuery, ReconcileCallbackCommand, ReconcileOutcome,
    SignedNoticeResult, TransactionStatusError,
};
use crate::config::SpaConfig;
use crate::domain::foundation::{DomainError, ErrorCode, TransactionId};
use crate::domain::payment::{CallbackKind, FailureRouter, FailureTarget, Provider, RawCallback};
use crate::ports::{JobQueue, ProviderClient, SessionStore};

use super::dto::{ErrorResponse, SignedNoticeForm, TransactionStatusResponse};
use super::session::BrowserSession;
use super::spa::SpaShell;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct PaymentAppState {
    pub session_store: Arc<dyn SessionStore>,
    pub provider_client: Arc<dyn ProviderClient>,
    pub job_queue: Arc<dyn JobQueue>,
    pub spa: Arc<SpaConfig>,
    /// Provider whose signed notices arrive on the callback endpoints.
    pub default_provider: Provider,
    pub cookie_name: Arc<str>,
    /// Bound on each provider API call made while reconciling.
    pub provider_timeout: Duration,
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn reconciler(&self) -> CallbackReconciler {
        CallbackReconciler::new(
            self.session_store.clone(),
            self.provider_client.clone(),
            self.dispatcher(),
            self.provider_timeout,
        )
    }

    pub fn poll_handler(&self) -> PollForCompletionHandler {
        PollForCompletionHandler::new()
    }

    pub fn signed_notice_handler(&self) -> HandleSignedNoticeHandler {
        HandleSignedNoticeHandler::new(
            self.default_provider,
            self.provider_client.clone(),
            self.dispatcher(),
        )
    }

    pub fn transaction_status_handler(&self) -> GetTransactionStatusHandler {
        GetTransactionStatusHandler::new(self.session_store.clone(), self.provider_client.clone())
    }

    pub fn failure_router(&self) -> FailureRouter {
        FailureRouter::new(self.spa.supported_providers.iter().copied())
    }

    fn dispatcher(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(self.job_queue.clone())
    }

    fn shell(&self) -> SpaShell<'_> {
        SpaShell::new(&self.spa.media_url)
    }

    fn ensure_spa_enabled(&self) -> Result<(), PaymentApiError> {
        if self.spa.enabled {
            Ok(())
        } else {
            Err(PaymentApiError::spa_disabled())
        }
    }

    /// Supported provider named in the path, or 404.
    fn provider(&self, provider_name: &str) -> Result<Provider, PaymentApiError> {
        self.failure_router().provider(provider_name).ok_or_else(|| {
            tracing::error!(provider = provider_name, "Unexpected provider");
            PaymentApiError::not_found()
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Error answered by payment endpoints, wrapping a domain error.
#[derive(Debug)]
pub struct PaymentApiError(DomainError);

impl PaymentApiError {
    pub fn spa_disabled() -> Self {
        Self(DomainError::new(ErrorCode::Forbidden, "Payment pages are disabled"))
    }

    pub fn not_found() -> Self {
        Self(DomainError::new(ErrorCode::NotFound, "Not found"))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::new(ErrorCode::ValidationFailed, message))
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }
}

impl From<TransactionStatusError> for PaymentApiError {
    fn from(err: TransactionStatusError) -> Self {
        match err {
            TransactionStatusError::NotFound => Self(DomainError::new(
                ErrorCode::TransactionNotFound,
                "Transaction not found",
            )),
            TransactionStatusError::ProviderUnavailable(e) => Self(
                DomainError::new(ErrorCode::ExternalServiceError, "Payment provider unavailable")
                    .with_detail("cause", e.to_string()),
            ),
        }
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound | ErrorCode::TransactionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ExternalServiceError => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Details stay in the logs.
        if !self.0.details.is_empty() {
            tracing::warn!(error = %self.0, details = ?self.0.details, "Payment request failed");
        }

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Fields carried inside a signed notice. An undecodable notice has none.
fn notice_fields(signed_notice: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str(signed_notice).unwrap_or_else(|e| {
        tracing::info!(error = %e, "Undecodable signed notice");
        HashMap::new()
    })
}

fn raw_callback(
    kind: CallbackKind,
    fields: HashMap<String, String>,
    raw_query: Option<String>,
) -> RawCallback {
    RawCallback::new(kind, fields, raw_query.unwrap_or_default())
}

fn redirect_to_failure(target: &FailureTarget) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target.path())]).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// SPA Endpoints (browser redirects from providers)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /mozpay/spa/provider/{provider}/complete-payment
pub async fn complete_payment(
    State(state): State<PaymentAppState>,
    Path(provider_name): Path<String>,
    BrowserSession(session): BrowserSession,
    Query(fields): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, PaymentApiError> {
    state.ensure_spa_enabled()?;
    let provider = state.provider(&provider_name)?;
    let callback = raw_callback(CallbackKind::Completion, fields, raw_query);

    if provider.uses_polling() {
        let query = PollForCompletionQuery { provider, callback };
        let target = state
            .poll_handler()
            .handle(&query)
            .ok_or_else(PaymentApiError::not_found)?;
        let page = state
            .shell()
            .with_transaction_status_url(&target.status_url)
            .render();
        return Ok(page.into_response());
    }

    let cmd = ReconcileCallbackCommand {
        provider,
        session,
        callback,
    };
    match state.reconciler().handle(cmd).await {
        ReconcileOutcome::Settled { .. } => Ok(state.shell().render().into_response()),
        ReconcileOutcome::Rejected(target) => Ok(redirect_to_failure(&target)),
    }
}

/// GET /mozpay/spa/provider/{provider}/payment-error
///
/// Only providers with a browser error callback use this endpoint.
pub async fn payment_error(
    State(state): State<PaymentAppState>,
    Path(provider_name): Path<String>,
    BrowserSession(session): BrowserSession,
    Query(fields): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, PaymentApiError> {
    state.ensure_spa_enabled()?;
    let provider = state.provider(&provider_name)?;
    if !provider.accepts_error_callback() {
        tracing::error!(provider = %provider, "Provider has no error callback");
        return Err(PaymentApiError::not_found());
    }

    let cmd = ReconcileCallbackCommand {
        provider,
        session,
        callback: raw_callback(CallbackKind::Error, fields, raw_query),
    };
    let target = match state.reconciler().handle(cmd).await {
        ReconcileOutcome::Rejected(target) => target,
        ReconcileOutcome::Settled { transaction_id, .. } => {
            tracing::error!(
                provider = %provider,
                transaction_id = %transaction_id,
                "Error callback settled a payment"
            );
            FailureTarget::new(provider, provider.fatal_error_code())
        }
    };
    Ok(redirect_to_failure(&target))
}

/// GET /mozpay/spa/provider/{provider}/payment-failure/{error_code}
pub async fn payment_failure(
    State(state): State<PaymentAppState>,
    Path((provider_name, error_code)): Path<(String, String)>,
) -> Result<Response, PaymentApiError> {
    state.ensure_spa_enabled()?;
    if state.failure_router().route(&provider_name, &error_code).is_none() {
        tracing::error!(
            provider = %provider_name,
            error_code = %error_code,
            "Unexpected payment failure page"
        );
        return Err(PaymentApiError::not_found());
    }
    Ok((StatusCode::BAD_REQUEST, state.shell().render()).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Polling Endpoint
// ════════════════════════════════════════════════════════════════════════════════

/// GET /mozpay/provider/transaction/{transaction_id}/status
pub async fn transaction_status(
    State(state): State<PaymentAppState>,
    Path(transaction_id): Path<String>,
    BrowserSession(session): BrowserSession,
) -> Result<Json<TransactionStatusResponse>, PaymentApiError> {
    state.ensure_spa_enabled()?;
    let transaction_id =
        TransactionId::new(transaction_id).map_err(|_| PaymentApiError::not_found())?;

    let query = GetTransactionStatusQuery {
        session,
        transaction_id,
    };
    let view = state.transaction_status_handler().handle(query).await?;
    Ok(Json(TransactionStatusResponse::from(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Server-to-server Callbacks
// ════════════════════════════════════════════════════════════════════════════════

/// POST /mozpay/callback/success
pub async fn callback_success(
    State(state): State<PaymentAppState>,
    form: Result<Form<SignedNoticeForm>, FormRejection>,
) -> Result<StatusCode, PaymentApiError> {
    signed_notice(state, NoticeKind::Success, form).await
}

/// POST /mozpay/callback/error
pub async fn callback_error(
    State(state): State<PaymentAppState>,
    form: Result<Form<SignedNoticeForm>, FormRejection>,
) -> Result<StatusCode, PaymentApiError> {
    signed_notice(state, NoticeKind::Error, form).await
}

async fn signed_notice(
    state: PaymentAppState,
    kind: NoticeKind,
    form: Result<Form<SignedNoticeForm>, FormRejection>,
) -> Result<StatusCode, PaymentApiError> {
    let Form(form) = form.map_err(|e| {
        tracing::info!(kind = kind.as_str(), error = %e, "Malformed callback");
        PaymentApiError::bad_request("signed_notice is required")
    })?;

    let cmd = HandleSignedNoticeCommand {
        kind,
        fields: notice_fields(&form.signed_notice),
        signed_notice: form.signed_notice,
    };
    match state.signed_notice_handler().handle(cmd).await {
        SignedNoticeResult::Accepted { .. } => Ok(StatusCode::NO_CONTENT),
        SignedNoticeResult::Invalid => Err(PaymentApiError::bad_request("invalid notice")),
        SignedNoticeResult::Incomplete => Err(PaymentApiError::bad_request("incomplete notice")),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
