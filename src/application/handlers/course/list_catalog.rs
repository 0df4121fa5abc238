//! ListCatalogHandler - Query handler for the course catalogue.
//!
//! Pairs every billing course with the caller's access state. Anonymous
//! visitors see prices only; logged-in users also see what they own or rent.

use std::sync::Arc;

use crate::application::handlers::clock::{system_clock, Clock};
use crate::domain::billing::{
    AccessToken, BillingCourse, BillingError, CourseAccess, TransactionFilter,
};
use crate::ports::BillingService;

/// Query for the catalogue.
#[derive(Debug, Clone, Default)]
pub struct ListCatalogQuery {
    /// Present when the visitor is logged in.
    pub access_token: Option<AccessToken>,
}

/// One catalogue row.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub course: BillingCourse,
    pub access: CourseAccess,
}

impl CatalogEntry {
    pub fn label(&self) -> String {
        self.access.label()
    }
}

/// Handler for listing the catalogue.
pub struct ListCatalogHandler {
    billing: Arc<dyn BillingService>,
    clock: Clock,
}

impl ListCatalogHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self {
            billing,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(&self, query: ListCatalogQuery) -> Result<Vec<CatalogEntry>, BillingError> {
        let (courses, payments) = match &query.access_token {
            Some(token) => {
                let filter = TransactionFilter::active_payments(None);
                futures::try_join!(
                    self.billing.list_courses(),
                    self.billing.list_transactions(token, &filter),
                )?
            }
            None => (self.billing.list_courses().await?, Vec::new()),
        };

        let now = (self.clock)();
        Ok(courses
            .into_iter()
            .map(|course| {
                let access = CourseAccess::evaluate(&course, &payments, now);
                CatalogEntry { course, access }
            })
            .collect())
    }
}
