use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried by an access token.
///
/// Timestamps are Unix seconds, as in RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Email of the account the token was issued to.
    pub email: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Build claims for `email` issued at `now` and living for `ttl`.
    ///
    /// A negative `ttl` is treated as zero so `exp` never precedes `iat`.
    ///
    /// # Errors
    /// * `EncodingFailed` - `now + ttl` is past the representable date range
    pub fn issued_at(
        email: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let ttl = ttl.max(Duration::zero());
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!(
                "token lifetime of {}s is out of range",
                ttl.num_seconds()
            ))
        })?;

        Ok(Self {
            email: email.into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Build claims for `email` issued right now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry overflows
    pub fn for_email(email: impl Into<String>, ttl: Duration) -> Result<Self, JwtError> {
        Self::issued_at(email, Utc::now(), ttl)
    }

    /// A token stops being valid at the exact second of `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
