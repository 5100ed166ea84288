//! Stateless JWT authentication.
//!
//! - [`JwtConfig`]: signing secret and token lifetimes from the environment
//! - [`JwtAuth`]: issues and verifies access/refresh token pairs
//! - [`jwt_auth_middleware`]: rejects requests without a valid access token
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/todos/", post(create))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{
    ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, REFRESH_TOKEN_TTL, TokenError, TokenPair, TokenType,
};
pub use middleware::{extract_token, jwt_auth_middleware};
