use std::sync::Arc;
use tracing::instrument;

use crate::error::{TodoError, TodoResult};
use crate::models::{CreateTodo, NewTodo, ReplaceTodo, Todo, TodoChanges, UpdateTodo};
use crate::query::TodoQuery;
use crate::repository::TodoRepository;

/// Service layer for Todo business logic
///
/// Input is validated before the repository is touched, so a rejected
/// command persists nothing.
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List todos matching the query, in the query's order
    pub async fn list_todos(&self, query: &TodoQuery) -> TodoResult<Vec<Todo>> {
        self.repository.list(query).await
    }

    #[instrument(skip(self), fields(todo_id = id))]
    pub async fn get_todo(&self, id: i64) -> TodoResult<Todo> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn create_todo(&self, input: CreateTodo) -> TodoResult<Todo> {
        let todo = NewTodo::try_from(input)?;
        self.add_todo(todo).await
    }

    /// Store an already validated todo
    #[instrument(skip(self, todo), fields(title = %todo.title))]
    pub async fn add_todo(&self, todo: NewTodo) -> TodoResult<Todo> {
        self.repository.create(todo).await
    }

    /// Overwrite title, priority and completed
    #[instrument(skip(self, input), fields(todo_id = id))]
    pub async fn replace_todo(&self, id: i64, input: ReplaceTodo) -> TodoResult<Todo> {
        let changes = TodoChanges::try_from(input)?;
        self.apply_changes(id, changes).await
    }

    /// Overwrite only the supplied fields
    #[instrument(skip(self, input), fields(todo_id = id))]
    pub async fn update_todo(&self, id: i64, input: UpdateTodo) -> TodoResult<Todo> {
        let changes = TodoChanges::try_from(input)?;
        self.apply_changes(id, changes).await
    }

    async fn apply_changes(&self, id: i64, changes: TodoChanges) -> TodoResult<Todo> {
        self.repository
            .update(id, changes)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    #[instrument(skip(self), fields(todo_id = id))]
    pub async fn delete_todo(&self, id: i64) -> TodoResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TodoError::NotFound(id));
        }

        Ok(())
    }

    /// Flip `completed`
    #[instrument(skip(self), fields(todo_id = id))]
    pub async fn toggle_todo(&self, id: i64) -> TodoResult<Todo> {
        self.repository
            .toggle(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    /// Delete every completed todo. Zero deletions is not an error.
    #[instrument(skip(self))]
    pub async fn clear_completed(&self) -> TodoResult<u64> {
        self.repository.delete_completed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTodoRepository;
    use crate::models::TodoPriority;
    use crate::repository::MockTodoRepository;
    use sea_orm::DbErr;

    fn service() -> TodoService<InMemoryTodoRepository> {
        TodoService::new(InMemoryTodoRepository::new())
    }

    fn create(title: &str, priority: Option<i32>) -> CreateTodo {
        CreateTodo {
            title: Some(title.to_string()),
            priority,
            completed: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_retrieve() {
        let service = service();
        let created = service
            .create_todo(create("Buy milk", Some(1)))
            .await
            .unwrap();
        let fetched = service.get_todo(created.id).await.unwrap();

        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.priority, TodoPriority::High);
        assert!(!fetched.completed);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_invalid_priority_never_reaches_repository() {
        // No expectations: any repository call would panic.
        let service = TodoService::new(MockTodoRepository::new());

        for priority in [0, 4] {
            let result = service.create_todo(create("t", Some(priority))).await;
            assert!(matches!(result, Err(TodoError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_invalid_priority_persists_nothing() {
        let service = service();
        assert!(service.create_todo(create("t", Some(4))).await.is_err());

        assert!(service
            .list_todos(&TodoQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = service();
        let todo = service.create_todo(create("t", None)).await.unwrap();

        service.delete_todo(todo.id).await.unwrap();
        assert!(matches!(
            service.get_todo(todo.id).await,
            Err(TodoError::NotFound(id)) if id == todo.id
        ));
        assert!(matches!(
            service.delete_todo(todo.id).await,
            Err(TodoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_completed() {
        let service = service();
        let todo = service.create_todo(create("t", None)).await.unwrap();

        let once = service.toggle_todo(todo.id).await.unwrap();
        let twice = service.toggle_todo(todo.id).await.unwrap();

        assert!(once.completed);
        assert!(!twice.completed);
        assert!(todo.updated_at < once.updated_at);
        assert!(once.updated_at < twice.updated_at);
    }

    #[tokio::test]
    async fn test_replace_and_partial_update() {
        let service = service();
        let todo = service.create_todo(create("t", None)).await.unwrap();

        let replaced = service
            .replace_todo(
                todo.id,
                ReplaceTodo {
                    title: Some("new".to_string()),
                    priority: Some(3),
                    completed: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(replaced.title, "new");
        assert_eq!(replaced.priority, TodoPriority::Low);
        assert!(replaced.completed);

        let patched = service
            .update_todo(
                todo.id,
                UpdateTodo {
                    priority: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.title, "new");
        assert_eq!(patched.priority, TodoPriority::High);
        assert!(patched.completed);
    }

    #[tokio::test]
    async fn test_replace_missing_field_is_validation_error() {
        let service = service();
        let todo = service.create_todo(create("t", None)).await.unwrap();

        let result = service
            .replace_todo(
                todo.id,
                ReplaceTodo {
                    title: Some("new".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(TodoError::Validation(_))));
        assert_eq!(service.get_todo(todo.id).await.unwrap().title, "t");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut repo = MockTodoRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let service = TodoService::new(repo);
        let result = service.update_todo(42, UpdateTodo::default()).await;
        assert!(matches!(result, Err(TodoError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_clear_completed_counts() {
        let service = service();
        assert_eq!(service.clear_completed().await.unwrap(), 0);

        for i in 0..5 {
            let mut input = create(&format!("t{}", i), None);
            input.completed = Some(i % 2 == 0);
            service.create_todo(input).await.unwrap();
        }

        assert_eq!(service.clear_completed().await.unwrap(), 3);
        let remaining = service.list_todos(&TodoQuery::default()).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn test_default_list_order() {
        let service = service();
        for priority in [2, 1, 3, 1] {
            service
                .create_todo(create(&format!("p{}", priority), Some(priority)))
                .await
                .unwrap();
        }

        let todos = service.list_todos(&TodoQuery::default()).await.unwrap();
        let priorities: Vec<i32> = todos.iter().map(|t| t.priority.as_i32()).collect();
        assert_eq!(priorities, vec![1, 1, 2, 3]);
        assert_eq!(todos[0].id, 4);
        assert_eq!(todos[1].id, 2);
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut repo = MockTodoRepository::new();
        repo.expect_delete_completed()
            .returning(|| Err(TodoError::Database(DbErr::Custom("down".into()))));

        let service = TodoService::new(repo);
        assert!(matches!(
            service.clear_completed().await,
            Err(TodoError::Database(_))
        ));
    }
}
