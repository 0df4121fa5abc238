//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Billing Ports
//!
//! - `BillingService` - Every operation the remote billing service offers
//! - `BillingTransport` - One HTTP round trip to billing

mod billing_service;
mod billing_transport;

pub use billing_service::BillingService;
pub use billing_transport::{BillingRequest, BillingTransport, RawResponse};
