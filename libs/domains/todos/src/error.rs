use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo {0} not found")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type TodoResult<T> = Result<T, TodoError>;

/// Convert TodoError to AppError for standardized error responses
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(id) => AppError::NotFound(format!("Todo {} not found", id)),
            TodoError::Validation(errors) => AppError::ValidationError(errors),
            TodoError::InvalidQuery(msg) => AppError::InvalidQuery(msg),
            TodoError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<TodoError> for tonic::Status {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(_) => tonic::Status::not_found(err.to_string()),
            TodoError::Validation(_) | TodoError::InvalidQuery(_) => {
                tonic::Status::invalid_argument(err.to_string())
            }
            TodoError::Database(e) => {
                tracing::error!("Database error in gRPC handler: {:?}", e);
                tonic::Status::internal("Database error")
            }
        }
    }
}
