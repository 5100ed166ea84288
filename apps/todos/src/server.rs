//! Server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Database connection and migrations
//! - Service creation, shared by both transports
//! - HTTP and gRPC servers with one shutdown signal

use axum_helpers::{JwtAuth, ShutdownCoordinator, create_production_app, health_router};
use core_config::Environment;
use database::RetryConfig;
use domain_todos::{PgTodoRepository, TodoGrpcService, TodoService};
use domain_users::{PgUserRepository, UserService};
use eyre::{Result, WrapErr};
use migration::Migrator;
use tracing::info;

use crate::config::Config;
use crate::openapi::ApiDoc;
use crate::{api, grpc};

/// Run the HTTP and gRPC servers
///
/// This is the main entry point for server initialization. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to the database with retry logic and applies migrations
/// 3. Creates the bootstrap account when one is configured
/// 4. Serves REST and gRPC from the same `TodoService` until SIGINT/SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is missing or invalid
/// - Database connection or migrations fail
/// - Either server fails to bind or run
pub async fn run() -> Result<()> {
    // Initialize tracing (env-aware: JSON for prod, pretty for dev)
    core_config::tracing::init_tracing(Environment::from_env());

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    let grpc_addr = config
        .grpc
        .socket_addr()
        .wrap_err("Invalid gRPC listen address")?;

    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(
        config.database.clone(),
        RetryConfig::startup(),
    )
    .await
    .wrap_err("Failed to connect to database")?;
    info!("Connected to database successfully");

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .wrap_err("Failed to run database migrations")?;

    let users = UserService::new(PgUserRepository::new(db.clone()));
    if let Some(admin) = &config.admin {
        users
            .ensure_user(&admin.username, &admin.password)
            .await
            .wrap_err("Failed to create bootstrap account")?;
    }

    // One service instance backs both transports
    let todos = TodoService::new(PgTodoRepository::new(db.clone()));
    let jwt_auth = JwtAuth::new(&config.jwt);

    let api_routes = api::routes(todos.clone(), users, jwt_auth, config.environment);

    // create_router adds docs/middleware to our composed routes
    let app = axum_helpers::create_router::<ApiDoc>(api_routes)
        .wrap_err("Failed to build HTTP router")?
        // - /health: liveness check with app name/version
        // - /ready: readiness check with a database ping
        .merge(health_router(config.app))
        .merge(api::ready_router(db.clone()));

    let shutdown = ShutdownCoordinator::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move { shutdown.wait_for_signal().await }
    });

    info!(
        "Starting {} v{} ({:?})",
        config.app.name, config.app.version, config.environment
    );

    // Whichever server stops first takes the other one down with it
    let (http_result, grpc_result) = tokio::join!(
        async {
            let result = create_production_app(app, &config.server, shutdown.clone())
                .await
                .wrap_err("HTTP server failed");
            shutdown.shutdown();
            result
        },
        async {
            let result =
                grpc::serve(TodoGrpcService::new(todos), grpc_addr, shutdown.clone()).await;
            shutdown.shutdown();
            result
        },
    );

    info!("Shutting down: closing database connections");
    database::postgres::close(db).await;

    http_result?;
    grpc_result?;

    info!("Todos server shutdown complete");
    Ok(())
}
