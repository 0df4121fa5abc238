//! Scripted billing transport for testing.
//!
//! Replays queued responses in order and records every request it receives,
//! so tests can drive `HttpBillingClient` without a network.
//!
//! # Example
//!
//! ```ignore
//! let transport = ScriptedTransport::new();
//! transport.push_json(StatusCode::OK, json!([{"code": "sql", "type": "free"}]));
//!
//! let client = HttpBillingClient::new(Arc::new(transport.clone()));
//! let courses = client.list_courses().await?;
//! assert_eq!(transport.requests()[0].path(), "/courses");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use http::StatusCode;

use crate::domain::billing::BillingError;
use crate::ports::{BillingRequest, BillingTransport, RawResponse};

/// Transport that answers from a script.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    replies: VecDeque<Result<RawResponse, BillingError>>,
    requests: Vec<BillingRequest>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Script
    // ════════════════════════════════════════════════════════════════════════════

    /// Queue a response with a raw body.
    pub fn push(&self, status: StatusCode, body: impl Into<String>) {
        self.state()
            .replies
            .push_back(Ok(RawResponse::new(status, body)));
    }

    /// Queue a response with a JSON body.
    pub fn push_json(&self, status: StatusCode, body: serde_json::Value) {
        self.push(status, body.to_string());
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: BillingError) {
        self.state().replies.push_back(Err(error));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<BillingRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    /// Replies not consumed yet.
    pub fn pending(&self) -> usize {
        self.state().replies.len()
    }
}

#[async_trait]
impl BillingTransport for ScriptedTransport {
    async fn send(&self, request: BillingRequest) -> Result<RawResponse, BillingError> {
        let mut state = self.state();
        state.requests.push(request);
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(BillingError::unavailable("no scripted response left")))
    }
}
