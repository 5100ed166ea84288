//! Users Domain
//!
//! Credential checks and token exchange for the todo API.
//!
//! # Features
//!
//! - Username/password login with Argon2 hashes
//! - Uniform failure for unknown user, wrong password and inactive account
//! - Renewal of access tokens from a longer-lived renewal token
//! - Idempotent bootstrap of an initial account
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /auth/login/, POST /auth/refresh/
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Password hashing, credential checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use core_config::{Environment, FromEnv};
//! use domain_users::{InMemoryUserRepository, UserService, handlers};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = UserService::new(InMemoryUserRepository::new());
//! let jwt = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let router = handlers::router(service, jwt, Environment::from_env());
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{AuthError, AuthResult};
pub use handlers::{AuthApiDoc, AuthState};
pub use models::{
    LoginRequest, LoginResponse, NewUser, RefreshRequest, RefreshResponse, User, UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
