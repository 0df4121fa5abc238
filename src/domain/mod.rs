//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamps, validation and auth errors)
//! - `billing` - Billing records, tokens, payments and the course access policy

pub mod billing;
pub mod foundation;
