//! Authentication errors for the session layer.
//!
//! The billing client reports *what the billing service said*; these errors
//! describe *what the session should do about it*. The web layer turns them
//! into a login redirect or a "service temporarily unavailable" page.
//!
//! # Design Decisions
//!
//! - Only [`AuthError::InvalidCredentials`], [`AuthError::InvalidToken`] and
//!   [`AuthError::TokenExpired`] send the user back to the login form
//! - Anything the user cannot fix by logging in again is
//!   [`AuthError::ServiceUnavailable`]

use thiserror::Error;

/// Authentication errors raised while logging in or keeping a session fresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username or password rejected by the billing service.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Registration attempted with a username that is already taken.
    #[error("A user with this email already exists")]
    UserAlreadyExists,

    /// The access token was rejected by the billing service.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The access token expired and there is no refresh token to renew it.
    #[error("Token expired")]
    TokenExpired,

    /// The identity lacks the role required for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Billing is unreachable, misbehaving, or returned data we cannot use.
    #[error("Service temporarily unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired
        )
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
