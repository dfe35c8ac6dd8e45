//! Axum router configuration for payment endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    callback_error, callback_success, complete_payment, health, payment_error, payment_failure,
    transaction_status, PaymentAppState,
};

/// Create the SPA router for provider browser redirects.
///
/// # Routes
/// - `GET /mozpay/spa/provider/:provider_name/complete-payment`
/// - `GET /mozpay/spa/provider/:provider_name/payment-error`
/// - `GET /mozpay/spa/provider/:provider_name/payment-failure/:error_code`
pub fn spa_routes() -> Router<PaymentAppState> {
    Router::new()
        .route(
            "/mozpay/spa/provider/:provider_name/complete-payment",
            get(complete_payment),
        )
        .route(
            "/mozpay/spa/provider/:provider_name/payment-error",
            get(payment_error),
        )
        .route(
            "/mozpay/spa/provider/:provider_name/payment-failure/:error_code",
            get(payment_failure),
        )
}

/// Create the provider router: transaction polling and signed callbacks.
///
/// # Routes
/// - `GET /mozpay/provider/transaction/:transaction_id/status`
/// - `POST /mozpay/callback/success`
/// - `POST /mozpay/callback/error`
pub fn provider_routes() -> Router<PaymentAppState> {
    Router::new()
        .route(
            "/mozpay/provider/transaction/:transaction_id/status",
            get(transaction_status),
        )
        .route("/mozpay/callback/success", post(callback_success))
        .route("/mozpay/callback/error", post(callback_error))
}

/// Build the complete application router.
///
/// SPA routes are mounted only when `spa.enabled_urls` is set.
pub fn payment_router(state: PaymentAppState, request_timeout: Duration) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .merge(provider_routes());

    if state.spa.enabled_urls {
        router = router.merge(spa_routes());
    } else {
        tracing::info!("SPA URLs disabled, not mounting payment pages");
    }

    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
