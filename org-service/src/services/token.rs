//! Session token service: stateless signed tokens with a fixed TTL.
//!
//! Tokens are never revoked server-side; expiry is the only termination
//! mechanism.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::models::Role;

/// Signed session claims. A fixed-shape record: every consumer agrees on the
/// fields, and the password hash can never leak into a token because there is
/// no field for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Opaque external user id.
    pub sub: String,
    /// Opaque external company id.
    pub cid: String,
    pub role: Role,
    pub email: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Outcome of verifying a token. Expired and malformed are distinct because
/// the boundary answers them with different status codes.
#[derive(Debug)]
pub enum TokenStatus {
    Valid(SessionClaims),
    Expired,
    Invalid,
}

/// HS256 token service over a server-held symmetric secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Issue a session token for an authenticated user. Signing failure is an
    /// error, never an empty token.
    pub fn issue(
        &self,
        user_id: &str,
        company_id: &str,
        role: Role,
        email: &str,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_seconds);

        let claims = SessionClaims {
            sub: user_id.to_string(),
            cid: company_id.to_string(),
            role,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to sign session token: {}", e))
        })
    }

    /// Verify signature and expiry. Always returns a tagged status, never
    /// panics past the boundary. A token is accepted strictly while
    /// `now < exp` - no grace period.
    pub fn verify(&self, token: &str) -> TokenStatus {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => {
                // jsonwebtoken accepts exp == now; the contract is exclusive.
                if data.claims.exp <= Utc::now().timestamp() {
                    TokenStatus::Expired
                } else {
                    TokenStatus::Valid(data.claims)
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => TokenStatus::Expired,
            Err(_) => TokenStatus::Invalid,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}
