//! Billing domain module.
//!
//! Types exchanged with the remote billing service and the policies built on
//! top of them.
//!
//! # Module Structure
//!
//! - `access` - Course access policy and catalogue labels
//! - `course` - Billing-side course records and course drafts
//! - `credentials` - Login and registration credentials
//! - `errors` - Billing error taxonomy
//! - `identity` - Remote user identity
//! - `payment` - Payment receipts and user-facing outcomes
//! - `token` - Access/refresh tokens and their lifecycle state
//! - `transaction` - Balance movements and history filters

mod access;
mod course;
mod credentials;
mod errors;
mod identity;
mod payment;
mod token;
mod transaction;

pub use access::{format_amount, CourseAccess};
pub use course::{BillingCourse, CourseDraft, CourseType};
pub use credentials::{Credentials, MIN_PASSWORD_LENGTH};
pub use errors::BillingError;
pub use identity::{Identity, ROLE_SUPER_ADMIN, ROLE_USER};
pub use payment::{PaymentOutcome, PaymentReceipt};
pub use token::{
    AccessToken, AccessTokenClaims, RefreshToken, TokenDecodeError, TokenPair, TokenState,
    UserSession, DEFAULT_REFRESH_MARGIN_SECS,
};
pub use transaction::{Transaction, TransactionFilter, TransactionType};
