//! Billing transport port.
//!
//! One HTTP round trip to the billing service. Implementations add the base
//! URL, JSON headers, the bearer header and the timeout; they never interpret
//! the status code. That is the response mapper's job.

use async_trait::async_trait;
use http::{Method, StatusCode};

use crate::domain::billing::{AccessToken, BillingError};

/// Port for sending a request to billing.
#[async_trait]
pub trait BillingTransport: Send + Sync {
    /// Performs the round trip.
    ///
    /// # Errors
    ///
    /// `ServiceUnavailable` when no response was received (connect failure,
    /// timeout, broken stream). A received response is `Ok` whatever its status.
    async fn send(&self, request: BillingRequest) -> Result<RawResponse, BillingError>;
}

/// A request relative to the billing base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingRequest {
    pub method: Method,

    /// Path below the base URL, one entry per segment. Segments are encoded
    /// individually, so a `/` inside one never splits it.
    pub segments: Vec<String>,

    /// Query pairs, sent in order.
    pub query: Vec<(String, String)>,

    /// JSON body; only sent with POST.
    pub body: Option<serde_json::Value>,

    pub bearer: Option<AccessToken>,
}

impl BillingRequest {
    /// Request for a fixed route such as `/courses` or `/token/refresh`.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Appends one path segment taken verbatim, e.g. a course code.
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Path for logs and assertions, e.g. `/courses/python-programming/pay`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: &AccessToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }

    /// Body to put on the wire: POST only, and never an empty object.
    pub fn wire_body(&self) -> Option<&serde_json::Value> {
        if self.method != Method::POST {
            return None;
        }
        match &self.body {
            Some(serde_json::Value::Object(map)) if map.is_empty() => None,
            Some(serde_json::Value::Null) => None,
            other => other.as_ref(),
        }
    }
}

/// Status and raw body of a billing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
