//! CheckCourseAccessHandler - Query handler for the course detail page.
//!
//! Decides whether lessons are shown and whether the pay button is offered.

use std::sync::Arc;

use crate::domain::billing::{
    AccessToken, BillingCourse, BillingError, CourseAccess, Identity, PaymentOutcome,
};
use crate::ports::BillingService;

/// Query for one course.
#[derive(Debug, Clone)]
pub struct CheckCourseAccessQuery {
    pub access_token: Option<AccessToken>,
    pub course_code: String,

    /// `payment_status` from the redirect after paying; unknown codes are dropped.
    pub payment_status: Option<u8>,
}

/// Billing view of a course for a logged-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseAccessView {
    pub course: BillingCourse,
    pub identity: Identity,
    pub paid: bool,
    pub access: CourseAccess,

    /// Whether the balance covers the price.
    pub can_afford: bool,

    pub payment_outcome: Option<PaymentOutcome>,
}

impl CourseAccessView {
    /// The pay button is offered for locked courses only.
    pub fn can_pay(&self) -> bool {
        !self.paid && !self.course.course_type.is_free()
    }
}

/// Handler for checking course access.
pub struct CheckCourseAccessHandler {
    billing: Arc<dyn BillingService>,
}

impl CheckCourseAccessHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    /// Returns `None` for anonymous visitors; billing is not asked.
    pub async fn handle(
        &self,
        query: CheckCourseAccessQuery,
    ) -> Result<Option<CourseAccessView>, BillingError> {
        let Some(token) = query.access_token.as_ref() else {
            return Ok(None);
        };

        let (identity, course) = futures::try_join!(
            self.billing.current_identity(token),
            self.billing.get_course(&query.course_code),
        )?;
        let paid = self.billing.is_course_paid(token, &course).await?;

        let access = CourseAccess::evaluate_paid(&course, paid);
        let can_afford = identity.balance >= course.price();
        let payment_outcome = query.payment_status.and_then(PaymentOutcome::from_code);

        Ok(Some(CourseAccessView {
            course,
            identity,
            paid,
            access,
            can_afford,
            payment_outcome,
        }))
    }
}
