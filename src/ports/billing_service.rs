//! Billing service port.
//!
//! The full set of operations the remote billing service offers. The HTTP
//! client and the in-memory service both implement it; handlers only ever see
//! `Arc<dyn BillingService>`.
//!
//! Tokens are passed per call. Implementations cache nothing between calls.

use async_trait::async_trait;

use crate::domain::billing::{
    AccessToken, BillingCourse, BillingError, CourseDraft, Credentials, Identity,
    PaymentReceipt, RefreshToken, TokenPair, Transaction, TransactionFilter,
};

/// Port for billing operations.
#[async_trait]
pub trait BillingService: Send + Sync {
    /// Exchanges credentials for a token pair.
    ///
    /// `InvalidCredentials` when billing does not recognise them.
    async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, BillingError>;

    /// Creates an account and returns its first token pair.
    ///
    /// `UserAlreadyExists` when the username is taken.
    async fn register(&self, credentials: &Credentials) -> Result<TokenPair, BillingError>;

    /// Mints a new pair from a refresh token. Every failure is `ServiceUnavailable`.
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, BillingError>;

    /// Identity the access token belongs to.
    ///
    /// `InvalidToken` when billing rejects the token.
    async fn current_identity(&self, access_token: &AccessToken) -> Result<Identity, BillingError>;

    async fn list_courses(&self) -> Result<Vec<BillingCourse>, BillingError>;

    /// `NotFound` for an unknown code.
    async fn get_course(&self, code: &str) -> Result<BillingCourse, BillingError>;

    /// Debits the balance and records a payment.
    ///
    /// Called at most once per user action; the result is never retried.
    async fn pay_course(
        &self,
        access_token: &AccessToken,
        code: &str,
    ) -> Result<PaymentReceipt, BillingError>;

    async fn list_transactions(
        &self,
        access_token: &AccessToken,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, BillingError>;

    /// Creates a course, or updates `existing_code` when given.
    ///
    /// Returns billing's `success` flag.
    async fn save_course(
        &self,
        access_token: &AccessToken,
        draft: &CourseDraft,
        existing_code: Option<&str>,
    ) -> Result<bool, BillingError>;

    /// True if the user may open the course.
    ///
    /// Free courses are paid without asking billing. Otherwise the course is
    /// paid iff billing lists at least one unexpired payment for it.
    async fn is_course_paid(
        &self,
        access_token: &AccessToken,
        course: &BillingCourse,
    ) -> Result<bool, BillingError> {
        if course.course_type.is_free() {
            return Ok(true);
        }

        let filter = TransactionFilter::active_payments(Some(&course.code));
        let payments = self.list_transactions(access_token, &filter).await?;
        Ok(!payments.is_empty())
    }
}
