//! webpay - Provider callback reconciliation
//!
//! Receives payment provider redirects and notices, checks them against the
//! provider API and the user's session, and queues marketplace notifications
//! for settled payments.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
