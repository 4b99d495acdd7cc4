// JWT token generation and validation service

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ApiError;

/// Access tokens are valid for 10 minutes
pub const ACCESS_TOKEN_DURATION_SECS: i64 = 600;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String, // subject (user id)
    pub email: String,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

impl Claims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// True once `now` is past the expiration instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// Token service for JWT operations
///
/// Stateless: there is no revocation list, expiry is the only invalidation.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_duration: i64, // in seconds
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_duration: ACCESS_TOKEN_DURATION_SECS,
        }
    }

    /// Issue a signed access token for `subject_id`
    pub fn issue(&self, subject_id: &str, email: &str) -> Result<(String, DateTime<Utc>), ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: subject_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.access_token_duration,
        };
        let token = self.sign(&claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| ApiError::internal("token expiry is out of range"))?;
        Ok((token, expires_at))
    }

    /// Sign arbitrary claims with the shared secret (HS256)
    pub fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("failed to sign token: {}", e)))
    }

    /// Verify signature and structure and return the claims
    ///
    /// Expiry is not checked here; a well-signed expired token parses and the
    /// caller decides what to do with `claims.exp`.
    pub fn validate_and_parse(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::InvalidToken(format!("invalid token: {}", e)))
    }
}
