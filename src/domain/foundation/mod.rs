//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects and error types shared by the billing
//! domain and the session handlers.

mod auth;
mod errors;
mod timestamp;

pub use auth::AuthError;
pub use errors::{is_email_like, ValidationError};
pub use timestamp::{Timestamp, SIMPLE_DATETIME_FORMAT};
