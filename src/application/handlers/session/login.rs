//! LoginHandler - Command handler for logging in.

use std::sync::Arc;

use crate::domain::billing::{Credentials, Identity, UserSession};
use crate::domain::foundation::AuthError;
use crate::ports::BillingService;

/// Command to log in with a username and password.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub credentials: Credentials,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub session: UserSession,
    pub identity: Identity,
}

/// Handler for logging in.
pub struct LoginHandler {
    billing: Arc<dyn BillingService>,
}

impl LoginHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, AuthError> {
        let pair = self
            .billing
            .authenticate(&cmd.credentials)
            .await
            .map_err(|e| {
                tracing::info!(username = %cmd.credentials.username(), error = %e, "Login rejected");
                AuthError::from(e)
            })?;

        let session = UserSession::from(pair);
        let identity = self
            .billing
            .current_identity(&session.access_token)
            .await?;

        tracing::info!(username = %identity.username, "User logged in");
        Ok(LoginResult { session, identity })
    }
}
