//! Integration tests for the payment HTTP endpoints.
//!
//! These tests drive the full axum router with in-memory sessions, the mock
//! provider API client and the in-memory job queue:
//! 1. Provider redirects settle or redirect to the failure page
//! 2. Unknown providers and codes are routing misses
//! 3. SPA switches (disabled pages, unmounted URLs)
//! 4. Polling and signed server-to-server notices

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use webpay::adapters::http::payment::TransactionStatusResponse;
use webpay::adapters::http::{payment_router, PaymentAppState};
use webpay::adapters::queue::JobReceiver;
use webpay::adapters::{InMemoryJobQueue, InMemorySessionStore, MockProviderClient};
use webpay::config::SpaConfig;
use webpay::domain::foundation::{SessionId, TransactionId};
use webpay::domain::payment::{
    Provider, TransactionRecord, TransactionStatus, TRANS_ID_KEY,
};
use webpay::ports::{JobKind, NoticeResult, ProviderClientError, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

const COOKIE: &str = "webpay_sessionid=sess1";

struct TestApp {
    router: Router,
    sessions: InMemorySessionStore,
    provider: MockProviderClient,
    receiver: JobReceiver,
}

impl TestApp {
    fn new() -> Self {
        Self::with_spa(SpaConfig::default())
    }

    fn with_spa(spa: SpaConfig) -> Self {
        let sessions = InMemorySessionStore::new();
        let provider = MockProviderClient::new();
        let (queue, receiver) = InMemoryJobQueue::new();

        let state = PaymentAppState {
            session_store: Arc::new(sessions.clone()),
            provider_client: Arc::new(provider.clone()),
            job_queue: Arc::new(queue),
            spa: Arc::new(spa),
            default_provider: Provider::Bango,
            cookie_name: Arc::from("webpay_sessionid"),
            provider_timeout: Duration::from_secs(5),
        };

        Self {
            router: payment_router(state, Duration::from_secs(30)),
            sessions,
            provider,
            receiver,
        }
    }

    async fn start_transaction(&self, transaction_id: &str) {
        self.sessions
            .set(&session(), TRANS_ID_KEY, json!(transaction_id))
            .await
            .unwrap();
    }

    async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, COOKIE)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_form(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    fn queued(&mut self) -> Vec<(JobKind, String)> {
        let mut jobs = Vec::new();
        while let Ok(job) = self.receiver.try_recv() {
            jobs.push((job.kind, job.transaction_id.as_str().to_string()));
        }
        jobs
    }
}

fn session() -> SessionId {
    SessionId::parse("sess1").unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn failure_path(provider: &str, code: &str) -> String {
    format!("/mozpay/spa/provider/{}/payment-failure/{}", provider, code)
}

// =============================================================================
// Completion Callbacks
// =============================================================================

#[tokio::test]
async fn matching_ok_callback_settles_and_notifies() {
    let mut app = TestApp::new();
    app.start_transaction("T1").await;

    let response = app
        .get("/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T1")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<div id=\"app\">"));
    assert_eq!(app.queued(), vec![(JobKind::PaymentNotify, "T1".to_string())]);
}

#[tokio::test]
async fn mismatched_transaction_redirects_without_notifying() {
    let mut app = TestApp::new();
    app.start_transaction("T1").await;

    let response = app
        .get("/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T2")
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), failure_path("bango", "NO_ACTIVE_TRANS"));
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn refused_notice_check_redirects_to_notice_error() {
    let mut app = TestApp::new();
    app.provider
        .set_confirm_error(ProviderClientError::from_status(400, "bad notice"));

    let response = app
        .get("/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T1")
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), failure_path("bango", "NOTICE_ERROR"));
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn failed_notice_verdict_redirects_to_notice_error() {
    let app = TestApp::new();
    app.start_transaction("T1").await;
    app.provider.set_confirm_result(NoticeResult::fail("bad signature"));

    let response = app
        .get("/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T1")
        .await;

    assert_eq!(location(&response), failure_path("bango", "NOTICE_ERROR"));
}

#[tokio::test]
async fn provider_outage_redirects_to_notice_exception() {
    let app = TestApp::new();
    app.start_transaction("T1").await;
    app.provider.set_confirm_error(ProviderClientError::Timeout);

    let response = app
        .get("/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T1")
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), failure_path("bango", "NOTICE_EXCEPTION"));
}

#[tokio::test]
async fn response_codes_map_to_failure_pages() {
    let cases = [
        ("CANCEL", "USER_CANCELLED"),
        ("NOT_SUPPORTED", "UNSUPPORTED_PAY"),
        ("NOT_OK", "BANGO_ERROR"),
        ("SURPRISE", "BAD_BANGO_CODE"),
    ];

    for (response_code, expected) in cases {
        let mut app = TestApp::new();
        app.start_transaction("T1").await;

        let uri = format!(
            "/mozpay/spa/provider/bango/complete-payment?ResponseCode={}&MerchantTransactionId=T1",
            response_code
        );
        let response = app.get(&uri).await;

        assert_eq!(response.status(), StatusCode::FOUND, "code {}", response_code);
        assert_eq!(location(&response), failure_path("bango", expected), "code {}", response_code);
        assert!(app.queued().is_empty(), "code {}", response_code);
    }
}

#[tokio::test]
async fn missing_transaction_id_redirects_to_trans_missing() {
    let app = TestApp::new();
    app.start_transaction("T1").await;

    let response = app
        .get("/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK")
        .await;

    assert_eq!(location(&response), failure_path("bango", "TRANS_MISSING"));
}

#[tokio::test]
async fn replayed_callback_settles_again_with_one_notification() {
    let mut app = TestApp::new();
    app.start_transaction("T1").await;
    app.provider.add_transaction(TransactionRecord {
        uuid: TransactionId::new("T1").unwrap(),
        status: TransactionStatus::Pending,
        provider: Provider::Bango,
        pay_url: None,
    });
    let uri = "/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T1";

    let first = app.get(uri).await;
    let second = app.get(uri).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(app.queued().len(), 1);
}

#[tokio::test]
async fn reference_provider_settles_on_completion() {
    let mut app = TestApp::new();
    app.start_transaction("T9").await;

    let response = app
        .get("/mozpay/spa/provider/reference/complete-payment?ext_transaction_id=T9&sig=abc")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.queued(), vec![(JobKind::PaymentNotify, "T9".to_string())]);
}

// =============================================================================
// Error Callbacks
// =============================================================================

#[tokio::test]
async fn bango_error_callback_redirects_to_failure_page() {
    let app = TestApp::new();
    app.start_transaction("T1").await;

    let response = app
        .get("/mozpay/spa/provider/bango/payment-error?ResponseCode=CANCEL&MerchantTransactionId=T1")
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), failure_path("bango", "USER_CANCELLED"));
}

#[tokio::test]
async fn bango_error_callback_with_ok_code_is_a_bad_code() {
    let mut app = TestApp::new();
    app.start_transaction("T1").await;

    let response = app
        .get("/mozpay/spa/provider/bango/payment-error?ResponseCode=OK&MerchantTransactionId=T1")
        .await;

    assert_eq!(location(&response), failure_path("bango", "BAD_BANGO_CODE"));
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn reference_error_callback_redirects_to_ext_error() {
    let app = TestApp::new();
    app.start_transaction("T9").await;

    let response = app
        .get("/mozpay/spa/provider/reference/payment-error?ext_transaction_id=T9")
        .await;

    assert_eq!(location(&response), failure_path("reference", "EXT_ERROR"));
}

#[tokio::test]
async fn boku_has_no_error_callback() {
    let app = TestApp::new();
    let response = app
        .get("/mozpay/spa/provider/boku/payment-error?param=T1")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Routing Misses
// =============================================================================

const PROVIDER_ENDPOINTS: &[&str] = &[
    "/mozpay/spa/provider/{provider}/complete-payment",
    "/mozpay/spa/provider/{provider}/payment-error",
    "/mozpay/spa/provider/{provider}/payment-failure/USER_CANCELLED",
];

#[tokio::test]
async fn unknown_provider_is_not_found_on_every_endpoint() {
    let app = TestApp::new();

    for endpoint in PROVIDER_ENDPOINTS {
        let uri = endpoint.replace("{provider}", "whatever");
        let response = app.get(&uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn unsupported_provider_is_not_found_on_every_endpoint() {
    let app = TestApp::with_spa(SpaConfig {
        supported_providers: vec![Provider::Reference],
        ..Default::default()
    });

    for endpoint in PROVIDER_ENDPOINTS {
        let uri = endpoint.replace("{provider}", "bango");
        let response = app.get(&uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

// =============================================================================
// Failure Page
// =============================================================================

#[tokio::test]
async fn failure_page_serves_shell_with_bad_request() {
    let app = TestApp::new();
    let response = app
        .get("/mozpay/spa/provider/bango/payment-failure/USER_CANCELLED")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn failure_page_with_unknown_code_is_not_found() {
    let app = TestApp::new();
    let response = app
        .get("/mozpay/spa/provider/bango/payment-failure/NOT_A_CODE")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// SPA Switches
// =============================================================================

#[tokio::test]
async fn disabled_spa_answers_forbidden() {
    let mut app = TestApp::with_spa(SpaConfig {
        enabled: false,
        ..Default::default()
    });
    app.start_transaction("T1").await;

    let uris = [
        "/mozpay/spa/provider/bango/complete-payment?ResponseCode=OK&MerchantTransactionId=T1",
        "/mozpay/spa/provider/bango/payment-error?ResponseCode=CANCEL",
        "/mozpay/spa/provider/bango/payment-failure/USER_CANCELLED",
        "/mozpay/provider/transaction/T1/status",
    ];
    for uri in uris {
        assert_eq!(app.get(uri).await.status(), StatusCode::FORBIDDEN, "{}", uri);
    }
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn spa_urls_can_be_left_unmounted() {
    let app = TestApp::with_spa(SpaConfig {
        enabled_urls: false,
        ..Default::default()
    });

    let response = app
        .get("/mozpay/spa/provider/bango/payment-failure/USER_CANCELLED")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.get("/health").await.status(), StatusCode::OK);
}

// =============================================================================
// Polling
// =============================================================================

#[tokio::test]
async fn boku_completion_serves_shell_with_status_url() {
    let mut app = TestApp::new();

    let response = app
        .get("/mozpay/spa/provider/boku/complete-payment?param=T5&sig=xyz")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("data-transaction-status-url=\"/mozpay/provider/transaction/T5/status\""));
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn boku_completion_without_transaction_is_not_found() {
    let app = TestApp::new();
    let response = app
        .get("/mozpay/spa/provider/boku/complete-payment?sig=xyz")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_endpoint_reports_session_transaction() {
    let app = TestApp::new();
    app.start_transaction("T5").await;
    app.provider.add_transaction(TransactionRecord {
        uuid: TransactionId::new("T5").unwrap(),
        status: TransactionStatus::Completed,
        provider: Provider::Boku,
        pay_url: None,
    });

    let response = app.get("/mozpay/provider/transaction/T5/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: TransactionStatusResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        body,
        TransactionStatusResponse {
            status: TransactionStatus::Completed,
            provider: Provider::Boku,
        }
    );
}

#[tokio::test]
async fn status_endpoint_hides_other_transactions() {
    let app = TestApp::new();
    app.start_transaction("T5").await;
    app.provider.add_transaction(TransactionRecord {
        uuid: TransactionId::new("T6").unwrap(),
        status: TransactionStatus::Completed,
        provider: Provider::Boku,
        pay_url: None,
    });

    let response = app.get("/mozpay/provider/transaction/T6/status").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_endpoint_unknown_upstream_is_not_found() {
    let app = TestApp::new();
    app.start_transaction("T5").await;

    let response = app.get("/mozpay/provider/transaction/T5/status").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Signed Notices
// =============================================================================

#[tokio::test]
async fn valid_success_notice_queues_payment_notification() {
    let mut app = TestApp::new();

    let response = app
        .post_form(
            "/mozpay/callback/success",
            "signed_notice=ext_transaction_id%3DT7%26sig%3Dabc",
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.queued(), vec![(JobKind::PaymentNotify, "T7".to_string())]);
}

#[tokio::test]
async fn valid_error_notice_queues_chargeback_notification() {
    let mut app = TestApp::new();

    let response = app
        .post_form(
            "/mozpay/callback/error",
            "signed_notice=ext_transaction_id%3DT7%26sig%3Dabc",
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.queued(), vec![(JobKind::ChargebackNotify, "T7".to_string())]);
}

#[tokio::test]
async fn invalid_notice_is_bad_request() {
    let mut app = TestApp::new();
    app.provider.set_create_result(NoticeResult::fail("bad signature"));

    let response = app
        .post_form("/mozpay/callback/success", "signed_notice=ext_transaction_id%3DT7")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn notice_without_transaction_is_bad_request() {
    let mut app = TestApp::new();

    let response = app
        .post_form("/mozpay/callback/success", "signed_notice=sig%3Dabc")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn missing_signed_notice_field_is_bad_request() {
    let app = TestApp::new();
    let response = app.post_form("/mozpay/callback/success", "other=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_answers_ok() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
