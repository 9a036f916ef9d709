//! Bearer token handling.
//!
//! Login returns a compact JWT. Only the `exp` claim is read out of its
//! payload segment; signature verification is the remote's job, not ours.
//! Staleness is computed lazily from `exp` at ask time -- no timers.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// An authenticated session token plus its decoded expiry.
///
/// Owned exclusively by the client instance that authenticated; the factory
/// keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    access_token: String,
    expires_at: i64,
}

impl AuthToken {
    /// Decode the `exp` claim out of a compact JWT without verifying its
    /// signature.
    pub fn from_jwt(access_token: impl Into<String>) -> Result<Self, ApiError> {
        let access_token = access_token.into();
        let expires_at = decode_expiry(&access_token)?;
        Ok(Self {
            access_token,
            expires_at,
        })
    }

    /// The raw token string, as sent in `Authorization: Bearer` headers.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Expiry instant, epoch seconds.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Whether the token has expired, judged against the wall clock now.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(chrono::Utc::now().timestamp())
    }

    /// Staleness at an arbitrary instant; `now >= exp` counts as stale.
    pub fn is_stale_at(&self, now_epoch_secs: i64) -> bool {
        now_epoch_secs >= self.expires_at
    }
}

fn decode_expiry(jwt: &str) -> Result<i64, ApiError> {
    let payload = jwt
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::Token("not a compact JWT".to_owned()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ApiError::Token(format!("payload segment is not base64url: {e}")))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Token(format!("missing or invalid exp claim: {e}")))?;
    Ok(claims.exp)
}
