//! Todos Domain
//!
//! A personal todo list: CRUD, filtering, search and ordering over REST, and a
//! read-only list over gRPC. Both transports sit on the same [`TodoService`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ ┌──────────────┐
//! │ REST handlers│ │ gRPC handler │  ← Transport (axum / tonic)
//! └──────┬───────┘ └──────┬───────┘
//!        └────────┬───────┘
//! ┌───────────────▼──────┐
//! │       Service        │  ← Validation, not-found mapping
//! └───────────────┬──────┘
//! ┌───────────────▼──────┐
//! │     Repository       │  ← Data access (Postgres or in-memory)
//! └───────────────┬──────┘
//! ┌───────────────▼──────┐
//! │  Models / TodoQuery  │  ← Entities, DTOs, list parameters
//! └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todos::{PgTodoRepository, TodoService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let repository = PgTodoRepository::new(db);
//! let service = TodoService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod conversions;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{TodoError, TodoResult};
pub use handlers::{TodoGrpcService, TodosApiDoc, router};
pub use memory::InMemoryTodoRepository;
pub use models::{
    ClearCompletedResponse, CreateTodo, NewTodo, ReplaceTodo, Todo, TodoChanges, TodoPriority,
    UpdateTodo,
};
pub use postgres::PgTodoRepository;
pub use query::{SortField, SortKey, TodoQuery};
pub use repository::TodoRepository;
pub use service::TodoService;
