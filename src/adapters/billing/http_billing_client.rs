//! HTTP billing client.
//!
//! Implements the `BillingService` port on top of a `BillingTransport`. Each
//! operation builds its request, applies its own status table and decodes
//! the body. Nothing is cached between calls.
//!
//! # Configuration
//!
//! ```ignore
//! let client = HttpBillingClient::from_config(&config.billing)?;
//! let courses = client.list_courses().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::BillingConfig;
use crate::domain::billing::{
    AccessToken, BillingCourse, BillingError, CourseDraft, Credentials, Identity,
    PaymentReceipt, RefreshToken, TokenPair, Transaction, TransactionFilter,
};
use crate::ports::{BillingRequest, BillingService, BillingTransport, RawResponse};

use super::reqwest_transport::ReqwestBillingTransport;
use super::response_mapper::{classify, decode, decode_validated, no_endpoint_errors};

/// Body of a course save response.
#[derive(Debug, Deserialize)]
struct SaveCourseResponse {
    #[serde(default)]
    success: bool,
}

/// Billing client speaking HTTP through a transport.
#[derive(Clone)]
pub struct HttpBillingClient {
    transport: Arc<dyn BillingTransport>,
}

impl HttpBillingClient {
    pub fn new(transport: Arc<dyn BillingTransport>) -> Self {
        Self { transport }
    }

    /// Client over a reqwest transport built from configuration.
    pub fn from_config(config: &BillingConfig) -> Result<Self, BillingError> {
        let transport = ReqwestBillingTransport::new(config)
            .map_err(|e| BillingError::unavailable(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::new(Arc::new(transport)))
    }

    async fn exchange<F>(
        &self,
        request: BillingRequest,
        endpoint_errors: F,
    ) -> Result<RawResponse, BillingError>
    where
        F: Fn(StatusCode) -> Option<BillingError> + Send,
    {
        let response = self.transport.send(request).await?;
        classify(response, endpoint_errors)
    }
}

/// Request under `/courses/{code}`; the code stays a single path segment.
fn course_request(method: Method, code: &str) -> BillingRequest {
    BillingRequest::new(method, "/courses").with_segment(code)
}

#[async_trait]
impl BillingService for HttpBillingClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, BillingError> {
        let request = BillingRequest::post("/auth").with_body(credentials.to_request_body());
        let response = self
            .exchange(request, |status| match status {
                StatusCode::UNAUTHORIZED => Some(BillingError::InvalidCredentials),
                _ => None,
            })
            .await?;
        decode(&response)
    }

    async fn register(&self, credentials: &Credentials) -> Result<TokenPair, BillingError> {
        let request = BillingRequest::post("/register").with_body(credentials.to_request_body());
        let response = self
            .exchange(request, |status| match status {
                StatusCode::CONFLICT => Some(BillingError::UserAlreadyExists),
                _ => None,
            })
            .await?;
        decode(&response)
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, BillingError> {
        let request = BillingRequest::post("/token/refresh")
            .with_body(json!({ "refresh_token": refresh_token.expose() }));
        let response = self.exchange(request, no_endpoint_errors).await?;
        decode(&response)
    }

    async fn current_identity(&self, access_token: &AccessToken) -> Result<Identity, BillingError> {
        let request = BillingRequest::get("/users/current").with_bearer(access_token);
        let response = self
            .exchange(request, |status| match status {
                StatusCode::UNAUTHORIZED => Some(BillingError::InvalidToken),
                _ => None,
            })
            .await?;
        decode_validated(&response, Identity::validate)
    }

    async fn list_courses(&self) -> Result<Vec<BillingCourse>, BillingError> {
        let response = self
            .exchange(BillingRequest::get("/courses"), no_endpoint_errors)
            .await?;
        decode(&response)
    }

    async fn get_course(&self, code: &str) -> Result<BillingCourse, BillingError> {
        let response = self
            .exchange(course_request(Method::GET, code), |status| match status {
                StatusCode::NOT_FOUND => Some(BillingError::NotFound),
                _ => None,
            })
            .await?;
        decode(&response)
    }

    async fn pay_course(
        &self,
        access_token: &AccessToken,
        code: &str,
    ) -> Result<PaymentReceipt, BillingError> {
        let request = course_request(Method::POST, code)
            .with_segment("pay")
            .with_bearer(access_token);
        let response = self
            .exchange(request, |status| match status {
                StatusCode::UNAUTHORIZED => Some(BillingError::InvalidToken),
                StatusCode::NOT_FOUND => Some(BillingError::NotFound),
                StatusCode::NOT_ACCEPTABLE => Some(BillingError::InsufficientFunds),
                StatusCode::CONFLICT => Some(BillingError::AlreadyPaid),
                _ => None,
            })
            .await?;

        let receipt: PaymentReceipt = decode(&response)?;
        tracing::info!(
            course_code = %code,
            success = receipt.success,
            "Course payment processed"
        );
        Ok(receipt)
    }

    async fn list_transactions(
        &self,
        access_token: &AccessToken,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, BillingError> {
        let request = BillingRequest::get("/transactions")
            .with_query(filter.query_pairs())
            .with_bearer(access_token);
        let response = self
            .exchange(request, |status| match status {
                StatusCode::UNAUTHORIZED => Some(BillingError::InvalidToken),
                _ => None,
            })
            .await?;
        decode(&response)
    }

    async fn save_course(
        &self,
        access_token: &AccessToken,
        draft: &CourseDraft,
        existing_code: Option<&str>,
    ) -> Result<bool, BillingError> {
        let request = match existing_code {
            Some(code) => course_request(Method::POST, code),
            None => BillingRequest::post("/courses"),
        };
        let body = serde_json::to_value(draft)
            .map_err(|e| BillingError::unavailable(format!("cannot encode course: {e}")))?;
        let request = request
            .with_body(body)
            .with_bearer(access_token);

        let response = self
            .exchange(request, |status| match status {
                StatusCode::UNAUTHORIZED => Some(BillingError::InvalidToken),
                StatusCode::FORBIDDEN => Some(BillingError::Forbidden),
                StatusCode::NOT_FOUND => Some(BillingError::NotFound),
                StatusCode::CONFLICT => Some(BillingError::AlreadyExists),
                _ => None,
            })
            .await?;

        let saved: SaveCourseResponse = decode(&response)?;
        tracing::info!(
            course_code = %draft.code,
            updated = existing_code.is_some(),
            success = saved.success,
            "Course saved in billing"
        );
        Ok(saved.success)
    }
}
