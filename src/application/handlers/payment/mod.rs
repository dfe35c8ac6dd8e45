//! Payment handlers.
//!
//! ## Commands
//! - Reconciling provider redirects against the session
//! - Processing signed server-to-server notices
//!
//! ## Queries
//! - Polling target for providers that settle after the redirect
//! - Transaction status for the polling browser
//!
//! `NotificationDispatcher` is shared by the commands to queue marketplace
//! notifications.

mod get_transaction_status;
mod handle_signed_notice;
mod notification_dispatcher;
mod poll_for_completion;
mod reconcile_callback;

pub use notification_dispatcher::{DispatchOutcome, NotificationDispatcher};

// Commands
pub use handle_signed_notice::{
    HandleSignedNoticeCommand, HandleSignedNoticeHandler, NoticeKind, SignedNoticeResult,
};
pub use reconcile_callback::{CallbackReconciler, ReconcileCallbackCommand, ReconcileOutcome};

// Queries
pub use get_transaction_status::{
    GetTransactionStatusHandler, GetTransactionStatusQuery, TransactionStatusError,
    TransactionStatusView,
};
pub use poll_for_completion::{
    transaction_status_url, PollForCompletionHandler, PollForCompletionQuery, PollTarget,
};
