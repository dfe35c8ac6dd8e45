//! HTTP adapter for payment endpoints.
//!
//! Provider browser redirects (SPA):
//! - `GET /mozpay/spa/provider/{provider}/complete-payment` - Settle or redirect to failure
//! - `GET /mozpay/spa/provider/{provider}/payment-error` - Redirect to failure
//! - `GET /mozpay/spa/provider/{provider}/payment-failure/{code}` - Failure page
//!
//! Provider endpoints:
//! - `GET /mozpay/provider/transaction/{id}/status` - Poll transaction status
//! - `POST /mozpay/callback/success` - Signed success notice
//! - `POST /mozpay/callback/error` - Signed chargeback notice

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod spa;

pub use dto::*;
pub use handlers::{PaymentApiError, PaymentAppState};
pub use routes::{payment_router, provider_routes, spa_routes};
pub use session::BrowserSession;
