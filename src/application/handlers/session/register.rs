//! RegisterHandler - Command handler for creating an account.
//!
//! Validates the registration form locally, registers with billing, then
//! loads the new identity with the returned tokens so the user is logged in.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::billing::{Credentials, Identity, UserSession};
use crate::domain::foundation::{AuthError, ValidationError};
use crate::ports::BillingService;

/// Command carrying the registration form.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub session: UserSession,
    pub identity: Identity,
}

/// Why registration failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The form is invalid; nothing was sent to billing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Handler for registering users.
pub struct RegisterHandler {
    billing: Arc<dyn BillingService>,
}

impl RegisterHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<RegisterResult, RegisterError> {
        let credentials =
            Credentials::for_registration(&cmd.email, &cmd.password, &cmd.password_confirmation)?;

        let pair = self
            .billing
            .register(&credentials)
            .await
            .map_err(AuthError::from)?;

        let session = UserSession::from(pair);
        let identity = self
            .billing
            .current_identity(&session.access_token)
            .await
            .map_err(AuthError::from)?;

        tracing::info!(username = %identity.username, "User registered");
        Ok(RegisterResult { session, identity })
    }
}
