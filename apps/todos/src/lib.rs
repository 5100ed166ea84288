//! Todos server: REST API, read-only gRPC projection and health endpoints in
//! one process.
//!
//! | Surface | Default address |
//! |---|---|
//! | REST under `/api`, Swagger UI at `/swagger-ui` | `0.0.0.0:8080` |
//! | `/health`, `/ready` | `0.0.0.0:8080` |
//! | gRPC `todos.v1.TodoService` + health | `0.0.0.0:50051` |

pub mod api;
pub mod config;
pub mod grpc;
pub mod openapi;
pub mod server;

pub use server::run;
