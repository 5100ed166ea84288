use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, TokenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, wrong password and inactive account all end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid renewal token: {0}")]
    InvalidToken(#[source] TokenError),

    /// The renewal token is valid but its user is gone or deactivated.
    #[error("User {0} can no longer authenticate")]
    UserUnavailable(i64),

    #[error("Failed to issue token: {0}")]
    TokenIssue(#[source] TokenError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::AuthenticationFailed,
            AuthError::InvalidToken(_) | AuthError::UserUnavailable(_) => {
                AppError::Unauthorized("Invalid or expired renewal token".to_string())
            }
            AuthError::TokenIssue(e) => AppError::InternalServerError(e.to_string()),
            AuthError::PasswordHash(msg) => AppError::InternalServerError(msg),
            AuthError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
