//! Access/refresh tokens and their lifecycle state.
//!
//! The access token is a three-part signed token (`header.payload.signature`).
//! Only billing verifies the signature; this side decodes the payload to learn
//! when the token expires and whom it belongs to.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::foundation::Timestamp;

/// Seconds before `exp` at which an access token is already treated as expired.
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 10;

/// Why an access token payload could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    #[error("token does not have three dot-separated parts")]
    NotThreeParts,

    #[error("token payload is not base64: {0}")]
    InvalidBase64(String),

    #[error("token payload is not valid claims JSON: {0}")]
    InvalidClaims(String),
}

/// Claims carried in the access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessTokenClaims {
    /// Expiry, Unix seconds.
    pub exp: i64,

    /// Identity the token was issued to.
    pub username: String,

    #[serde(default)]
    pub roles: Vec<String>,
}

/// Lifecycle state of a held access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Usable as is.
    Fresh,
    /// Past (or within the margin of) its expiry; needs a refresh.
    Expired,
    /// Payload cannot be decoded.
    Invalid,
}

/// Short-lived bearer credential.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the payload part into claims.
    ///
    /// Accepts both the URL-safe and the standard base64 alphabet, with or
    /// without padding.
    pub fn claims(&self) -> Result<AccessTokenClaims, TokenDecodeError> {
        let mut parts = self.0.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenDecodeError::NotThreeParts);
        };

        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .map_err(|e| TokenDecodeError::InvalidBase64(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| TokenDecodeError::InvalidClaims(e.to_string()))
    }

    /// Classifies the token at `now`.
    ///
    /// Expired when `exp <= now + margin_secs`.
    pub fn state_at(&self, now: Timestamp, margin_secs: i64) -> TokenState {
        match self.claims() {
            Ok(claims) if claims.exp <= now.as_unix_secs().saturating_add(margin_secs) => {
                TokenState::Expired
            }
            Ok(_) => TokenState::Fresh,
            Err(_) => TokenState::Invalid,
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Long-lived credential used to mint a new token pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(SecretString);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into()))
    }

    /// Returns the raw token. Callers must not log the result.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for RefreshToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for RefreshToken {}

/// Token pair issued by `/auth`, `/register` and `/token/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "token")]
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl TokenPair {
    pub fn new(access_token: AccessToken, refresh_token: RefreshToken) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

/// Tokens held by one authenticated browser session.
///
/// Never mutated field by field: a refresh produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub access_token: AccessToken,
    pub refresh_token: Option<RefreshToken>,
}

impl UserSession {
    pub fn new(access_token: AccessToken, refresh_token: Option<RefreshToken>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

impl From<TokenPair> for UserSession {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: Some(pair.refresh_token),
        }
    }
}
