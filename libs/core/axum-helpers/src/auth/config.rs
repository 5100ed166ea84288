//! JWT configuration loaded through `core_config::FromEnv`.

use super::jwt::{ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL};
use core_config::{ConfigError, FromEnv, env_parse, env_required};

const MIN_SECRET_LEN: usize = 32;

/// JWT authentication configuration.
///
/// Environment variables:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ACCESS_TTL_SECS` (default 900)
/// - `JWT_REFRESH_TTL_SECS` (default 604800)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl JwtConfig {
    /// Config with default lifetimes; fails on short secrets.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        validate_secret(&secret)?;
        Ok(Self {
            secret,
            access_ttl_secs: ACCESS_TOKEN_TTL,
            refresh_ttl_secs: REFRESH_TOKEN_TTL,
        })
    }

    pub fn with_ttls(mut self, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }
}

fn validate_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::InvalidValue {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                MIN_SECRET_LEN,
                secret.len()
            ),
        });
    }
    Ok(())
}

fn positive_ttl(key: &str, default: i64) -> Result<i64, ConfigError> {
    let ttl = env_parse(key, default)?;
    if ttl <= 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            details: "must be a positive number of seconds".to_string(),
        });
    }
    Ok(ttl)
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        validate_secret(&secret)?;

        Ok(Self {
            secret,
            access_ttl_secs: positive_ttl("JWT_ACCESS_TTL_SECS", ACCESS_TOKEN_TTL)?,
            refresh_ttl_secs: positive_ttl("JWT_REFRESH_TTL_SECS", REFRESH_TOKEN_TTL)?,
        })
    }
}
