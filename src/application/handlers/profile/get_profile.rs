//! GetProfileHandler - Query handler for the profile page.

use std::sync::Arc;

use crate::domain::billing::{AccessToken, BillingError, Identity};
use crate::ports::BillingService;

/// Query for the current user's profile.
#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub access_token: AccessToken,
}

/// Profile page data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub identity: Identity,
}

impl ProfileView {
    /// Role shown on the page.
    pub fn role_label(&self) -> &'static str {
        if self.identity.is_admin() {
            "Администратор"
        } else {
            "Пользователь"
        }
    }

    pub fn balance(&self) -> f64 {
        self.identity.balance
    }
}

/// Handler for the profile page.
pub struct GetProfileHandler {
    billing: Arc<dyn BillingService>,
}

impl GetProfileHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<ProfileView, BillingError> {
        let identity = self.billing.current_identity(&query.access_token).await?;
        Ok(ProfileView { identity })
    }
}
