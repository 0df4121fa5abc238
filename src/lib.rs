//! Study-On - Billing access layer for the course platform
//!
//! This crate gives the course platform typed access to the billing service:
//! authentication and token refresh, the course catalogue, payments,
//! transaction history and course editing, plus the access policy that
//! decides what a user may open.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
