//! Maps raw billing responses to typed values or typed failures.
//!
//! Each endpoint supplies its own status table as a closure. Statuses the
//! table does not know fall through to `ServiceUnavailable` when >= 400.

use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::domain::billing::BillingError;
use crate::domain::foundation::ValidationError;
use crate::ports::RawResponse;

/// Applies an endpoint status table.
///
/// Returns the response unchanged when the status is below 400.
pub fn classify<F>(response: RawResponse, endpoint_errors: F) -> Result<RawResponse, BillingError>
where
    F: Fn(StatusCode) -> Option<BillingError>,
{
    let status = response.status;
    if status.as_u16() < 400 {
        return Ok(response);
    }

    if let Some(error) = endpoint_errors(status) {
        tracing::debug!(status = status.as_u16(), error = %error, "Billing returned a mapped error");
        return Err(error);
    }

    tracing::warn!(status = status.as_u16(), "Billing returned an unexpected status");
    Err(BillingError::unavailable(format!(
        "billing responded with status {}",
        status.as_u16()
    )))
}

/// Status table with no endpoint-specific entries.
pub fn no_endpoint_errors(_status: StatusCode) -> Option<BillingError> {
    None
}

/// Parses the body as JSON.
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T, BillingError> {
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::warn!(error = %e, status = response.status.as_u16(), "Billing response did not parse");
        BillingError::malformed(e.to_string())
    })
}

/// Parses the body, then checks the decoded value.
///
/// A value that parses but fails validation is billing's fault and is
/// reported as `ServiceUnavailable`.
pub fn decode_validated<T, V>(response: &RawResponse, validate: V) -> Result<T, BillingError>
where
    T: DeserializeOwned,
    V: FnOnce(&T) -> Result<(), ValidationError>,
{
    let value = decode(response)?;
    validate(&value).map_err(|e| {
        tracing::warn!(error = %e, "Billing response failed validation");
        BillingError::unavailable(format!("billing data is not valid: {e}"))
    })?;
    Ok(value)
}
