//! Billing service adapters.
//!
//! Implements the `BillingService` and `BillingTransport` ports:
//! - `ReqwestBillingTransport` - HTTP round trips with timeout and connect retry
//! - `response_mapper` - status tables and body decoding
//! - `HttpBillingClient` - every billing operation over a transport
//! - `InMemoryBillingService` - the whole service in memory, for tests and demos
//! - `ScriptedTransport` - canned responses, for driving the HTTP client in tests
//!
//! # Configuration
//!
//! Environment variables (see `config::BillingConfig`):
//! - `STUDY_ON__BILLING__BASE_URL`: billing API root
//! - `STUDY_ON__BILLING__REQUEST_TIMEOUT_SECS`: hard request timeout

mod http_billing_client;
mod in_memory_billing_service;
mod reqwest_transport;
pub mod response_mapper;
mod scripted_transport;

pub use http_billing_client::HttpBillingClient;
pub use in_memory_billing_service::{
    InMemoryBillingService, ADMIN_EMAIL, ADMIN_PASSWORD, RENT_DAYS, USER_EMAIL, USER_PASSWORD,
};
pub use reqwest_transport::ReqwestBillingTransport;
pub use scripted_transport::ScriptedTransport;
