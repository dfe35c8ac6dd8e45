//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `payment` - Provider callbacks, classified errors and transaction records

pub mod foundation;
pub mod payment;
