use async_trait::async_trait;

use crate::error::TodoResult;
use crate::models::{NewTodo, Todo, TodoChanges};
use crate::query::TodoQuery;

/// Repository trait for Todo persistence
///
/// Every method is a single store operation. Mutations refresh `updated_at`
/// so that it strictly increases, and return `None` / `false` when no todo
/// has the given id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo, assigning its id and timestamps
    async fn create(&self, input: NewTodo) -> TodoResult<Todo>;

    async fn get_by_id(&self, id: i64) -> TodoResult<Option<Todo>>;

    /// Filtered, searched and ordered list
    async fn list(&self, query: &TodoQuery) -> TodoResult<Vec<Todo>>;

    /// Overwrite the supplied fields
    async fn update(&self, id: i64, changes: TodoChanges) -> TodoResult<Option<Todo>>;

    /// Flip `completed` in place
    async fn toggle(&self, id: i64) -> TodoResult<Option<Todo>>;

    async fn delete(&self, id: i64) -> TodoResult<bool>;

    /// Delete every completed todo, returning how many were removed
    async fn delete_completed(&self) -> TodoResult<u64>;
}
