//! Login credentials.
//!
//! Transient: built from a login or registration form, sent to billing once,
//! then dropped. The password never appears in `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::domain::foundation::{is_email_like, ValidationError};

/// Minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Username/password pair for `/auth` and `/register`.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Creates credentials for a login attempt.
    ///
    /// Login input is not validated locally; billing answers 401 for anything
    /// it does not recognise.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: SecretString::new(password.into()),
        }
    }

    /// Creates credentials from a registration form.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `InvalidFormat` when the email is blank or malformed
    /// - `TooShort` when the password is shorter than [`MIN_PASSWORD_LENGTH`]
    /// - `Mismatch` when the confirmation differs from the password
    pub fn for_registration(
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !is_email_like(email) {
            return Err(ValidationError::invalid_format("email", "not an email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::too_short("password", MIN_PASSWORD_LENGTH));
        }
        if password != confirmation {
            return Err(ValidationError::mismatch("password_confirmation", "password"));
        }
        Ok(Self::new(email, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password. Callers must not log the result.
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }

    /// JSON body for `/auth` and `/register`.
    pub fn to_request_body(&self) -> serde_json::Value {
        json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        })
    }
}
