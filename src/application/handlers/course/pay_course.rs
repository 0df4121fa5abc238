//! PayCourseHandler - Command handler for paying for a course.
//!
//! Calls billing exactly once and folds the answer into a `PaymentOutcome`
//! for the redirect back to the course page. Never retried.

use std::sync::Arc;

use crate::domain::billing::{AccessToken, BillingError, PaymentOutcome, PaymentReceipt};
use crate::ports::BillingService;

/// Command to pay for a course.
#[derive(Debug, Clone)]
pub struct PayCourseCommand {
    pub access_token: AccessToken,
    pub course_code: String,
}

/// Result of a payment attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PayCourseResult {
    pub outcome: PaymentOutcome,

    /// Billing's receipt when the call itself succeeded.
    pub receipt: Option<PaymentReceipt>,
}

impl PayCourseResult {
    /// Value for the `payment_status` redirect parameter.
    pub fn payment_status(&self) -> u8 {
        self.outcome.code()
    }
}

/// Handler for paying for courses.
pub struct PayCourseHandler {
    billing: Arc<dyn BillingService>,
}

impl PayCourseHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    /// # Errors
    ///
    /// Only `InvalidToken`, which calls for a new login. Every other failure
    /// is an outcome.
    pub async fn handle(&self, cmd: PayCourseCommand) -> Result<PayCourseResult, BillingError> {
        let result = self
            .billing
            .pay_course(&cmd.access_token, &cmd.course_code)
            .await;
        let receipt = result.as_ref().ok().cloned();
        let outcome = PaymentOutcome::from_payment(result)?;

        tracing::info!(
            course_code = %cmd.course_code,
            payment_status = outcome.code(),
            "Course payment attempted"
        );

        Ok(PayCourseResult { outcome, receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::billing::{
        InMemoryBillingService, ADMIN_EMAIL, ADMIN_PASSWORD, USER_EMAIL, USER_PASSWORD,
    };
    use crate::domain::billing::Credentials;

    async fn pay(billing: &InMemoryBillingService, token: &AccessToken, code: &str) -> PayCourseResult {
        PayCourseHandler::new(Arc::new(billing.clone()))
            .handle(PayCourseCommand {
                access_token: token.clone(),
                course_code: code.to_string(),
            })
            .await
            .unwrap()
    }

    async fn token(billing: &InMemoryBillingService, username: &str, password: &str) -> AccessToken {
        billing
            .authenticate(&Credentials::new(username, password))
            .await
            .unwrap()
            .access_token
    }

    #[tokio::test]
    async fn successful_payment_then_already_paid() {
        let billing = InMemoryBillingService::seeded();
        let token = token(&billing, USER_EMAIL, USER_PASSWORD).await;

        let first = pay(&billing, &token, "python-programming").await;
        let second = pay(&billing, &token, "python-programming").await;

        assert_eq!(first.outcome, PaymentOutcome::Succeeded);
        assert!(first.receipt.unwrap().expires_at.is_some());
        assert_eq!(second.outcome, PaymentOutcome::AlreadyPaid);
        assert_eq!(second.payment_status(), 2);
        assert_eq!(billing.call_count("pay_course"), 2);
    }

    #[tokio::test]
    async fn empty_balance_is_insufficient_funds() {
        let billing = InMemoryBillingService::seeded();
        let token = token(&billing, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let result = pay(&billing, &token, "python-programming").await;
        assert_eq!(result.outcome, PaymentOutcome::InsufficientFunds);
        assert!(result.receipt.is_none());
    }

    #[tokio::test]
    async fn outage_is_failed_and_not_retried() {
        let billing = InMemoryBillingService::seeded();
        let token = token(&billing, USER_EMAIL, USER_PASSWORD).await;
        billing.fail_method("pay_course", BillingError::unavailable("down"));

        let result = pay(&billing, &token, "python-programming").await;
        assert_eq!(result.outcome, PaymentOutcome::Failed);
        assert_eq!(billing.call_count("pay_course"), 1);
    }

    #[tokio::test]
    async fn rejected_token_propagates() {
        let billing = InMemoryBillingService::seeded();
        let result = PayCourseHandler::new(Arc::new(billing))
            .handle(PayCourseCommand {
                access_token: AccessToken::new("a.b.c"),
                course_code: "python-programming".to_string(),
            })
            .await;
        assert_eq!(result.unwrap_err(), BillingError::InvalidToken);
    }
}
