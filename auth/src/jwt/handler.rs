use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;

/// Algorithms a token header may name. Anything outside the HMAC family is
/// refused before the signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issues and parses HMAC-signed tokens with a secret fixed at construction.
///
/// Tokens are signed with HS256. Parsing checks structure and signature only;
/// expiry is left to the caller (see [`Claims::is_expired`]).
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a handler signing with `secret`.
    ///
    /// The secret should be at least 32 bytes for HS256.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for `email` that expires `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed or `ttl` overflows the expiry
    pub fn issue(&self, email: &str, ttl: Duration) -> Result<String, JwtError> {
        self.encode(&Claims::for_email(email, ttl)?)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed token, non-HMAC algorithm, bad signature
    ///   or a payload that is not [`Claims`]
    pub fn parse(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode(token)
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing or serialization failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and deserialize its payload into `T`.
    ///
    /// # Errors
    /// * `InvalidToken` - Any structural, algorithm or signature failure
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // expiry is checked by the caller against its own clock
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
