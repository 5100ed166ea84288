//! # Axum Helpers
//!
//! Shared building blocks for the HTTP surface.
//!
//! - **[`auth`]**: stateless JWT issue/verify and the route guard middleware
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: structured error responses with stable error codes
//! - **[`extractors`]**: numeric id path and validated JSON extractors

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, JwtConfig, REFRESH_TOKEN_TTL, TokenError, TokenPair,
    TokenType, jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator,
    create_production_app, create_router, health_router, run_health_checks, serve_with_shutdown,
};

pub use http::{cors_layer_from_env, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};
