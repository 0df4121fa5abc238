//! Billing service configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::billing::DEFAULT_REFRESH_MARGIN_SECS;

/// Billing service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Base URL all endpoint paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hard timeout for one request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Extra attempts after a failed connect; other failures are never retried
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Access tokens expiring within this many seconds are refreshed early
    #[serde(default = "default_refresh_margin")]
    pub token_refresh_margin_secs: i64,
}

impl BillingConfig {
    /// Configuration pointing at `base_url` with default limits
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ValidationError::MissingRequired("billing.base_url"));
        }
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| ValidationError::InvalidBillingUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidBillingUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if url.query().is_some() {
            return Err(ValidationError::InvalidBillingUrl(
                "base URL must not carry a query".to_string(),
            ));
        }
        if !(1..=60).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.connect_retries > 3 {
            return Err(ValidationError::TooManyRetries);
        }
        if !(0..=300).contains(&self.token_refresh_margin_secs) {
            return Err(ValidationError::InvalidRefreshMargin);
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            connect_retries: default_connect_retries(),
            token_refresh_margin_secs: default_refresh_margin(),
        }
    }
}

fn default_base_url() -> String {
    "http://billing.study-on.local/api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    5
}

fn default_connect_retries() -> u32 {
    1
}

fn default_refresh_margin() -> i64 {
    DEFAULT_REFRESH_MARGIN_SECS
}
