//! Payment domain module.
//!
//! Provider callbacks, their classification, and the transaction data the
//! callback flow reads.
//!
//! # Module Structure
//!
//! - `provider` - Provider adapters (callback dialects, notice confirmation)
//! - `callback` - Raw and canonical callback values
//! - `dev_message` - Closed set of classified error codes
//! - `reconciliation` - Callback reconciliation state machine
//! - `failure_router` - Error code to failure page mapping
//! - `transaction` - Provider API transaction record
//! - `session` - Session keys and stored metadata

mod callback;
mod dev_message;
mod failure_router;
mod provider;
mod reconciliation;
mod session;
mod transaction;

pub use callback::{CallbackKind, CallbackOutcome, CanonicalCallback, RawCallback};
pub use dev_message::DevMessage;
pub use failure_router::{FailureRouter, FailureTarget};
pub use provider::Provider;
pub use reconciliation::ReconciliationState;
pub use session::{session_transaction, TransactionNotes, NOTES_KEY, TRANS_ID_KEY};
pub use transaction::{TransactionRecord, TransactionStatus};
