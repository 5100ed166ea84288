use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT token time-to-live defaults
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 604800; // 7 days

/// Distinguishes short-lived access tokens from renewal tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,           // Subject (user ID)
    pub username: String,      // Login name
    pub token_type: TokenType, // access | refresh
    pub exp: i64,              // Expiration time
    pub iat: i64,              // Issued at
    pub jti: String,           // Unique token id
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("expected {expected:?} token, got {actual:?}")]
    WrongType {
        expected: TokenType,
        actual: TokenType,
    },
}

/// Stateless HS256 token issuer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        tracing::info!(
            access_ttl_secs = config.access_ttl_secs,
            refresh_ttl_secs = config.refresh_ttl_secs,
            "JWT auth initialized"
        );
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Issue an access token and a renewal token for the same subject.
    pub fn issue_pair(&self, user_id: &str, username: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.create_access_token(user_id, username)?,
            refresh_token: self.create_refresh_token(user_id, username)?,
        })
    }

    pub fn create_access_token(&self, user_id: &str, username: &str) -> Result<String, TokenError> {
        self.create_token(user_id, username, TokenType::Access, self.access_ttl_secs)
    }

    pub fn create_refresh_token(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<String, TokenError> {
        self.create_token(user_id, username, TokenType::Refresh, self.refresh_ttl_secs)
    }

    fn create_token(
        &self,
        user_id: &str,
        username: &str,
        token_type: TokenType,
        ttl_seconds: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            token_type,
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Verify signature and expiry, then require an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    /// Verify signature and expiry, then require a renewal token.
    pub fn verify_refresh_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<JwtClaims, TokenError> {
        let claims = decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Invalid)?
            .claims;

        if claims.token_type != expected {
            return Err(TokenError::WrongType {
                expected,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }
}
