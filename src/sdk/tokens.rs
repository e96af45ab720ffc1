//! # Token Capability
//!
//! Signed-token issue/parse handed to function code. Validation is
//! stateless: parsing a token touches no store.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{SdkError, SdkResult};

/// Claims carried by issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject
    pub sub: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Expiration (Unix epoch seconds)
    pub exp: i64,

    /// Optional scope tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Token issue/parse service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a service signing with the given secret
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a token for a subject
    pub fn issue(&self, sub: &str, scope: Option<&str>) -> SdkResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: sub.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            scope: scope.map(str::to_string),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| SdkError::TokenGenerationFailed)
    }

    /// Parse and validate a token, returning its claims
    pub fn parse(&self, token: &str) -> SdkResult<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SdkError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => SdkError::InvalidSignature,
                _ => SdkError::MalformedToken,
            }
        })?;

        Ok(data.claims)
    }
}
