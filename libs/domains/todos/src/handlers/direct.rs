use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_helpers::{ErrorResponse, IdPath, ValidatedJson};
use std::sync::Arc;

use crate::error::{TodoError, TodoResult};
use crate::models::{ClearCompletedResponse, CreateTodo, ReplaceTodo, Todo, UpdateTodo};
use crate::query::TodoQuery;
use crate::repository::TodoRepository;
use crate::service::TodoService;

/// List todos with optional filters, search and ordering
#[utoipa::path(
    get,
    path = "/todos/",
    tag = "todos",
    params(
        ("completed" = Option<bool>, Query, description = "true/false/1/0"),
        ("priority" = Option<i32>, Query, description = "1 = high, 2 = medium, 3 = low"),
        ("search" = Option<String>, Query, description = "Case-insensitive title substring"),
        ("ordering" = Option<String>, Query, description = "Comma-separated keys from priority, created_at; '-' prefix for descending. Default: priority,-created_at"),
    ),
    responses(
        (status = 200, description = "List of todos", body = Vec<Todo>),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> TodoResult<Json<Vec<Todo>>> {
    let Query(params) = params.map_err(|e| TodoError::InvalidQuery(e.body_text()))?;
    let query = TodoQuery::from_params(&params)?;

    let todos = service.list_todos(&query).await?;
    Ok(Json(todos))
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/todos/{id}/",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    IdPath(id): IdPath,
) -> TodoResult<impl IntoResponse> {
    let todo = service.get_todo(id).await?;
    Ok(Json(todo))
}

/// Create a new todo
#[utoipa::path(
    post,
    path = "/todos/",
    tag = "todos",
    request_body = CreateTodo,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Todo created successfully", body = Todo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTodo>,
) -> TodoResult<impl IntoResponse> {
    let todo = service.create_todo(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Replace title, priority and completed of a todo
#[utoipa::path(
    put,
    path = "/todos/{id}/",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    request_body = ReplaceTodo,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todo replaced", body = Todo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn replace_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<ReplaceTodo>,
) -> TodoResult<impl IntoResponse> {
    let todo = service.replace_todo(id, input).await?;
    Ok(Json(todo))
}

/// Update the supplied fields of a todo
#[utoipa::path(
    patch,
    path = "/todos/{id}/",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    request_body = UpdateTodo,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateTodo>,
) -> TodoResult<impl IntoResponse> {
    let todo = service.update_todo(id, input).await?;
    Ok(Json(todo))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/todos/{id}/",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    IdPath(id): IdPath,
) -> TodoResult<impl IntoResponse> {
    service.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the completed flag of a todo
#[utoipa::path(
    patch,
    path = "/todos/{id}/toggle/",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todo toggled", body = Todo),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn toggle_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    IdPath(id): IdPath,
) -> TodoResult<impl IntoResponse> {
    let todo = service.toggle_todo(id).await?;
    Ok(Json(todo))
}

/// Delete every completed todo
#[utoipa::path(
    delete,
    path = "/todos/clear_completed/",
    tag = "todos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Completed todos deleted", body = ClearCompletedResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn clear_completed<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
) -> TodoResult<Json<ClearCompletedResponse>> {
    let deleted = service.clear_completed().await?;
    Ok(Json(ClearCompletedResponse::new(deleted)))
}
