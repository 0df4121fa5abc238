//! Billing error taxonomy.
//!
//! Every billing operation returns one of these on failure. The transport and
//! the response mapper never recover locally; callers match on the variant.
//!
//! # HTTP Status Mapping
//!
//! | Error | Billing status |
//! |-------|----------------|
//! | InvalidCredentials | 401 on `/auth` |
//! | UserAlreadyExists | 409 on `/register` |
//! | InvalidToken | 401 on bearer-authenticated calls |
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | InsufficientFunds | 406 on `/courses/{code}/pay` |
//! | AlreadyPaid | 409 on `/courses/{code}/pay` |
//! | AlreadyExists | 409 on `/courses` |
//! | MalformedResponse | body did not parse |
//! | ServiceUnavailable | network failure or any other status >= 400 |

use thiserror::Error;

use crate::domain::foundation::AuthError;

/// Typed failure of a billing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Access token rejected by billing")]
    InvalidToken,

    #[error("Resource not found")]
    NotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Course already paid")]
    AlreadyPaid,

    #[error("Forbidden")]
    Forbidden,

    #[error("Resource already exists")]
    AlreadyExists,

    #[error("Malformed billing response: {0}")]
    MalformedResponse(String),

    #[error("Billing service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl BillingError {
    /// Creates a service unavailable error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Creates a malformed response error with a message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if the failure is the service's fault rather than the caller's.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BillingError::ServiceUnavailable(_) | BillingError::MalformedResponse(_)
        )
    }

    /// Returns true if the user has to log in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            BillingError::InvalidCredentials | BillingError::InvalidToken
        )
    }
}

impl From<BillingError> for AuthError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidCredentials => AuthError::InvalidCredentials,
            BillingError::UserAlreadyExists => AuthError::UserAlreadyExists,
            BillingError::InvalidToken => AuthError::InvalidToken,
            BillingError::Forbidden => AuthError::InsufficientPermissions,
            other => AuthError::ServiceUnavailable(other.to_string()),
        }
    }
}
