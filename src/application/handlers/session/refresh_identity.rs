//! RefreshIdentityHandler - Keeps a session's tokens fresh and reloads its identity.
//!
//! Runs on every authenticated request before the identity is trusted:
//!
//! 1. Decode the access token payload
//! 2. If it expires within the margin, spend the refresh token once
//! 3. Load the identity with the (possibly new) access token
//!
//! A failed refresh is never retried and never loops: the user sees
//! "service temporarily unavailable" and keeps the old session.

use std::sync::Arc;

use crate::application::handlers::clock::{system_clock, Clock};
use crate::config::BillingConfig;
use crate::domain::billing::{
    Identity, TokenState, UserSession, DEFAULT_REFRESH_MARGIN_SECS,
};
use crate::domain::foundation::AuthError;
use crate::ports::BillingService;

/// Command to refresh a session.
#[derive(Debug, Clone)]
pub struct RefreshIdentityCommand {
    pub session: UserSession,
}

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshIdentityResult {
    /// Session to keep; a new value when `refreshed` is true.
    pub session: UserSession,
    pub identity: Identity,
    pub refreshed: bool,
}

/// Handler for refreshing a session's identity.
pub struct RefreshIdentityHandler {
    billing: Arc<dyn BillingService>,
    refresh_margin_secs: i64,
    clock: Clock,
}

impl RefreshIdentityHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self {
            billing,
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
            clock: system_clock(),
        }
    }

    /// Handler using the refresh margin from billing configuration.
    pub fn from_config(billing: Arc<dyn BillingService>, config: &BillingConfig) -> Self {
        Self::new(billing).with_refresh_margin_secs(config.token_refresh_margin_secs)
    }

    /// Treat tokens expiring within `secs` as already expired.
    pub fn with_refresh_margin_secs(mut self, secs: i64) -> Self {
        self.refresh_margin_secs = secs;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(
        &self,
        cmd: RefreshIdentityCommand,
    ) -> Result<RefreshIdentityResult, AuthError> {
        let now = (self.clock)();
        let mut session = cmd.session;

        let refreshed = match session.access_token.state_at(now, self.refresh_margin_secs) {
            TokenState::Fresh => false,
            TokenState::Invalid => {
                tracing::warn!("Session access token cannot be decoded");
                return Err(AuthError::service_unavailable(
                    "access token cannot be decoded",
                ));
            }
            TokenState::Expired => {
                let Some(refresh_token) = session.refresh_token.as_ref() else {
                    tracing::info!("Access token expired and no refresh token is held");
                    return Err(AuthError::TokenExpired);
                };

                let pair = self.billing.refresh(refresh_token).await.map_err(|e| {
                    tracing::warn!(error = %e, "Token refresh failed");
                    AuthError::service_unavailable(e.to_string())
                })?;

                tracing::debug!("Access token refreshed");
                session = UserSession::from(pair);
                true
            }
        };

        let identity = self
            .billing
            .current_identity(&session.access_token)
            .await?;

        Ok(RefreshIdentityResult {
            session,
            identity,
            refreshed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::billing::{InMemoryBillingService, USER_EMAIL, USER_PASSWORD};
    use crate::application::handlers::clock::fixed_clock;
    use crate::domain::billing::{AccessToken, BillingError, Credentials};
    use crate::domain::foundation::Timestamp;
    use crate::ports::BillingService;

    fn start() -> Timestamp {
        Timestamp::parse_rfc3339("2024-03-01T12:00:00Z").unwrap()
    }

    async fn logged_in(billing: &InMemoryBillingService) -> UserSession {
        billing
            .authenticate(&Credentials::new(USER_EMAIL, USER_PASSWORD))
            .await
            .map(UserSession::from)
            .unwrap()
    }

    fn handler(billing: &InMemoryBillingService, now: Timestamp) -> RefreshIdentityHandler {
        RefreshIdentityHandler::new(Arc::new(billing.clone())).with_clock(fixed_clock(now))
    }

    #[tokio::test]
    async fn fresh_token_loads_identity_without_refresh() {
        let billing = InMemoryBillingService::seeded().with_now(start());
        let session = logged_in(&billing).await;

        let result = handler(&billing, start())
            .handle(RefreshIdentityCommand {
                session: session.clone(),
            })
            .await
            .unwrap();

        assert!(!result.refreshed);
        assert_eq!(result.session, session);
        assert_eq!(result.identity.username, USER_EMAIL);
        assert_eq!(billing.call_count("refresh"), 0);
    }

    #[tokio::test]
    async fn token_inside_margin_is_refreshed_once() {
        let billing = InMemoryBillingService::seeded()
            .with_now(start())
            .with_token_ttl_secs(5);
        let session = logged_in(&billing).await;

        let result = handler(&billing, start())
            .handle(RefreshIdentityCommand {
                session: session.clone(),
            })
            .await
            .unwrap();

        assert!(result.refreshed);
        assert_ne!(result.session.refresh_token, session.refresh_token);
        assert_eq!(billing.call_count("refresh"), 1);
        assert_eq!(billing.call_count("current_identity"), 1);
    }

    #[tokio::test]
    async fn margin_is_configurable() {
        let billing = InMemoryBillingService::seeded()
            .with_now(start())
            .with_token_ttl_secs(5);
        let session = logged_in(&billing).await;

        let result = handler(&billing, start())
            .with_refresh_margin_secs(0)
            .handle(RefreshIdentityCommand { session })
            .await
            .unwrap();

        assert!(!result.refreshed);
    }

    #[tokio::test]
    async fn configured_margin_decides_when_to_refresh() {
        let billing = InMemoryBillingService::seeded()
            .with_now(start())
            .with_token_ttl_secs(20);
        let session = logged_in(&billing).await;

        let strict = BillingConfig {
            token_refresh_margin_secs: 0,
            ..BillingConfig::default()
        };
        let result = RefreshIdentityHandler::from_config(Arc::new(billing.clone()), &strict)
            .with_clock(fixed_clock(start()))
            .handle(RefreshIdentityCommand {
                session: session.clone(),
            })
            .await
            .unwrap();
        assert!(!result.refreshed);
        assert_eq!(billing.call_count("refresh"), 0);

        let eager = BillingConfig {
            token_refresh_margin_secs: 30,
            ..BillingConfig::default()
        };
        let result = RefreshIdentityHandler::from_config(Arc::new(billing.clone()), &eager)
            .with_clock(fixed_clock(start()))
            .handle(RefreshIdentityCommand { session })
            .await
            .unwrap();
        assert!(result.refreshed);
        assert_eq!(billing.call_count("refresh"), 1);
    }

    #[tokio::test]
    async fn refresh_failure_is_service_unavailable() {
        let billing = InMemoryBillingService::seeded().with_now(start());
        let session = logged_in(&billing).await;
        billing.fail_method("refresh", BillingError::unavailable("down"));

        let result = handler(&billing, start().plus_secs(7200))
            .handle(RefreshIdentityCommand { session })
            .await;

        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
        assert_eq!(billing.call_count("refresh"), 1);
        assert_eq!(billing.call_count("current_identity"), 0);
    }

    #[tokio::test]
    async fn expired_without_refresh_token_requires_login() {
        let billing = InMemoryBillingService::seeded().with_now(start());
        let mut session = logged_in(&billing).await;
        session.refresh_token = None;

        let result = handler(&billing, start().plus_secs(7200))
            .handle(RefreshIdentityCommand { session })
            .await;

        assert_eq!(result.unwrap_err(), AuthError::TokenExpired);
        assert_eq!(billing.call_count("refresh"), 0);
    }

    #[tokio::test]
    async fn undecodable_token_is_service_unavailable() {
        let billing = InMemoryBillingService::seeded();
        let session = UserSession::new(AccessToken::new("not-a-token"), None);

        let result = handler(&billing, start())
            .handle(RefreshIdentityCommand { session })
            .await;

        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
        assert!(billing.call_log().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_invalid_token() {
        let billing = InMemoryBillingService::seeded().with_now(start());
        let session = logged_in(&billing).await;
        billing.fail_method("current_identity", BillingError::InvalidToken);

        let result = handler(&billing, start())
            .handle(RefreshIdentityCommand { session })
            .await;

        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }
}
