//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `billing` - Billing service over HTTP, plus in-memory and scripted doubles

pub mod billing;

pub use billing::{HttpBillingClient, InMemoryBillingService, ReqwestBillingTransport, ScriptedTransport};
