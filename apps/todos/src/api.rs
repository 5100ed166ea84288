use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{HealthCheckFuture, JwtAuth, run_health_checks};
use core_config::Environment;
use domain_todos::{TodoRepository, TodoService};
use domain_users::{UserRepository, UserService, handlers as auth};
use sea_orm::DatabaseConnection;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Each domain router carries its own state, so the result is stateless.
pub fn routes<R, U>(
    todos: TodoService<R>,
    users: UserService<U>,
    jwt_auth: JwtAuth,
    environment: Environment,
) -> Router
where
    R: TodoRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .merge(domain_todos::router(todos, jwt_auth.clone()))
        .merge(auth::router(users, jwt_auth, environment))
}

/// Readiness check endpoint that pings the database.
pub async fn ready_handler(State(db): State<DatabaseConnection>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&db)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await.into_response()
}

/// Creates a router with the /ready endpoint.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(db)
}
