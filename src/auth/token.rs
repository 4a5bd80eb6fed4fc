//! Bearer token signing and verification.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Upper bound on token lifetime (ten years).
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Claims carried by gateway tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Login of the authenticated user.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a gated request was rejected. Logged, never sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingToken,

    #[error("Authorization header is not a bearer token")]
    MalformedHeader,

    #[error("token expired")]
    Expired,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token algorithm not accepted")]
    WrongAlgorithm,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => AuthError::WrongAlgorithm,
            _ => AuthError::Malformed(e.to_string()),
        }
    }
}

/// Shared-secret key material for issuing and verifying tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm,
            validation: Validation::new(algorithm),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let algorithm = Algorithm::from_str(&config.algorithm)?;
        let secs = config.token_ttl_secs.min(MAX_TOKEN_TTL_SECS) as i64;
        let ttl = Duration::seconds(secs);
        Ok(Self::new(config.jwt_secret.as_bytes(), algorithm, ttl))
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issue a token for `subject`, valid from now for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding)
    }

    /// Check signature, declared algorithm, and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"salt_01", Algorithm::HS256, Duration::hours(1))
    }

    #[test]
    fn issued_token_verifies() {
        let keys = keys();
        let token = keys.issue("user1").unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let token = keys
            .issue_at("user1", Utc::now() - Duration::hours(3))
            .unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let other = TokenKeys::new(b"another", Algorithm::HS256, Duration::hours(1));
        let token = other.issue("user1").unwrap();
        assert_eq!(keys().verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn undeclared_algorithm_is_rejected() {
        let other = TokenKeys::new(b"salt_01", Algorithm::HS512, Duration::hours(1));
        let token = other.issue("user1").unwrap();
        assert_eq!(keys().verify(&token), Err(AuthError::WrongAlgorithm));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(keys().verify("not.a.jwt"), Err(AuthError::Malformed(_))));
        assert!(matches!(keys().verify(""), Err(AuthError::Malformed(_))));
    }

    #[test]
    fn from_config_rejects_unknown_algorithm() {
        let config = AuthConfig {
            algorithm: "HS999".into(),
            ..AuthConfig::default()
        };
        assert!(TokenKeys::from_config(&config).is_err());
    }
}
