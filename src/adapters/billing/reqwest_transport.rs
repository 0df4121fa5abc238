//! Reqwest-backed billing transport.
//!
//! Owns transport details only: URL assembly, JSON headers, bearer auth, the
//! request timeout and the connect retry. Status codes pass through untouched.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{header, Client, Url};

use crate::config::BillingConfig;
use crate::domain::billing::BillingError;
use crate::ports::{BillingRequest, BillingTransport, RawResponse};

/// Billing transport that performs real HTTP requests.
#[derive(Clone)]
pub struct ReqwestBillingTransport {
    client: Client,
    base_url: String,
    connect_retries: u32,
}

impl ReqwestBillingTransport {
    /// Build a transport from billing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &BillingConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            config.normalized_base_url(),
            config.request_timeout(),
            config.connect_retries,
        )
    }

    /// Build a transport with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_retries: u32,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connect_retries,
        })
    }

    /// Full URL for a request: base URL, percent-encoded path segments and
    /// form-encoded query pairs.
    pub fn build_url(&self, request: &BillingRequest) -> Result<Url, BillingError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BillingError::unavailable(format!("invalid billing base URL: {e}")))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BillingError::unavailable("billing base URL cannot have a path"))?;
            segments.pop_if_empty();
            segments.extend(request.segments.iter().map(String::as_str));
        }

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }

        Ok(url)
    }

    async fn send_once(
        &self,
        method: &reqwest::Method,
        request: &BillingRequest,
        url: &Url,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = request.wire_body() {
            builder = builder.json(body);
        }

        builder.send().await
    }
}

#[async_trait]
impl BillingTransport for ReqwestBillingTransport {
    async fn send(&self, request: BillingRequest) -> Result<RawResponse, BillingError> {
        let url = self.build_url(&request)?;
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| BillingError::unavailable(format!("unsupported method: {e}")))?;

        let mut attempt = 0;
        let response = loop {
            match self.send_once(&method, &request, &url).await {
                Ok(response) => break response,
                Err(e) if e.is_connect() && attempt < self.connect_retries => {
                    attempt += 1;
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path(),
                        attempt,
                        error = %e,
                        "Billing connect failed, retrying"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path(),
                        error = %e,
                        "Billing request failed"
                    );
                    return Err(map_transport_error(e));
                }
            }
        };

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| BillingError::unavailable(format!("invalid status code: {e}")))?;
        let body = response.text().await.map_err(map_transport_error)?;

        tracing::debug!(
            method = %request.method,
            path = %request.path(),
            status = status.as_u16(),
            "Billing request completed"
        );

        Ok(RawResponse::new(status, body))
    }
}

fn map_transport_error(error: reqwest::Error) -> BillingError {
    if error.is_timeout() {
        BillingError::unavailable(format!("billing request timed out: {error}"))
    } else if error.is_connect() {
        BillingError::unavailable(format!("cannot connect to billing: {error}"))
    } else {
        BillingError::unavailable(error.to_string())
    }
}
