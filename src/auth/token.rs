use crate::models::User;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Token lifetime: issued-at plus 24 hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a session JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: String,
    /// Username of the authenticated user.
    pub username: String,
    /// Role of the authenticated user ("admin" or "user").
    pub role: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Reasons a token can fail validation. The auth gate logs these and
/// surfaces a generic `Unauthorized` to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The token is past its expiry.
    Expired,
    /// Claims are missing or mistyped.
    Malformed,
    /// Signature or signing algorithm mismatch, or the token is not a JWT.
    InvalidSignature,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::Malformed => write!(f, "malformed token claims"),
            TokenError::InvalidSignature => write!(f, "invalid token signature"),
        }
    }
}

/// Issues and validates signed session tokens using the process-wide signing
/// key. Constructed once at startup from `Config` and shared by cloning.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Produces a signed HS256 token embedding the user's identity, username,
    /// and role, expiring in 24 hours.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiry = now + chrono::Duration::hours(TOKEN_TTL_HOURS);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.to_string(),
            iat: now.timestamp() as usize,
            exp: expiry.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::PersistenceFailure(format!("Failed to sign token: {}", e)))
    }

    /// Verifies a token's signature and expiry against the process-wide key
    /// and decodes its claims. Tokens signed with an algorithm other than
    /// HS256 are rejected.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                _ => TokenError::InvalidSignature,
            })
    }
}
