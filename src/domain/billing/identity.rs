//! Remote user identity as reported by `/users/current`.

use serde::Deserialize;

use crate::domain::foundation::{is_email_like, ValidationError};

/// Role granted to every registered user.
pub const ROLE_USER: &str = "ROLE_USER";

/// Role allowed to create and edit courses.
pub const ROLE_SUPER_ADMIN: &str = "ROLE_SUPER_ADMIN";

/// The billing service's view of the logged-in user.
///
/// Authoritative only for the duration of one fetch; never persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identity {
    pub username: String,

    #[serde(default)]
    pub roles: Vec<String>,

    pub balance: f64,
}

impl Identity {
    pub fn new(username: impl Into<String>, roles: Vec<String>, balance: f64) -> Self {
        Self {
            username: username.into(),
            roles,
            balance,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Checks the decoded record before it is trusted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        if !is_email_like(&self.username) {
            return Err(ValidationError::invalid_format("username", "not an email address"));
        }
        if !self.balance.is_finite() || self.balance < 0.0 {
            return Err(ValidationError::invalid_format(
                "balance",
                "must be a non-negative amount",
            ));
        }
        Ok(())
    }
}
