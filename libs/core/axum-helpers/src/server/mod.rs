//! Server infrastructure: router assembly with OpenAPI docs, health and
//! readiness endpoints, and shutdown coordination shared by every listener.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router, ShutdownCoordinator};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//!
//! let shutdown = ShutdownCoordinator::new();
//! create_production_app(router, &ServerConfig::default(), shutdown).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router, serve_with_shutdown};
pub use health::{
    HealthCheckFuture, HealthResponse, ReadyResponse, health_router, run_health_checks,
};
pub use shutdown::ShutdownCoordinator;
