use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::TodoResult;
use crate::models::{NewTodo, Todo, TodoChanges};
use crate::query::TodoQuery;
use crate::repository::TodoRepository;

/// In-memory implementation of TodoRepository (for testing and local runs)
#[derive(Default)]
pub struct InMemoryTodoRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Strictly after `previous`, even if the clock has not moved.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, input: NewTodo) -> TodoResult<Todo> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let now = Utc::now();
        let todo = Todo {
            id: state.last_id,
            title: input.title,
            priority: input.priority,
            completed: input.completed,
            created_at: now,
            updated_at: now,
        };
        state.todos.insert(todo.id, todo.clone());

        tracing::info!(todo_id = todo.id, "Created todo");
        Ok(todo)
    }

    async fn get_by_id(&self, id: i64) -> TodoResult<Option<Todo>> {
        let state = self.state.read().await;
        Ok(state.todos.get(&id).cloned())
    }

    async fn list(&self, query: &TodoQuery) -> TodoResult<Vec<Todo>> {
        let state = self.state.read().await;
        let mut todos: Vec<Todo> = state
            .todos
            .values()
            .filter(|todo| query.matches(todo))
            .cloned()
            .collect();

        todos.sort_by(|a, b| query.compare(a, b));
        Ok(todos)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> TodoResult<Option<Todo>> {
        let mut state = self.state.write().await;
        let Some(todo) = state.todos.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(priority) = changes.priority {
            todo.priority = priority;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = next_timestamp(todo.updated_at);

        tracing::info!(todo_id = id, "Updated todo");
        Ok(Some(todo.clone()))
    }

    async fn toggle(&self, id: i64) -> TodoResult<Option<Todo>> {
        let mut state = self.state.write().await;
        let Some(todo) = state.todos.get_mut(&id) else {
            return Ok(None);
        };

        todo.completed = !todo.completed;
        todo.updated_at = next_timestamp(todo.updated_at);

        tracing::info!(todo_id = id, completed = todo.completed, "Toggled todo");
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: i64) -> TodoResult<bool> {
        let mut state = self.state.write().await;
        let deleted = state.todos.remove(&id).is_some();
        if deleted {
            tracing::info!(todo_id = id, "Deleted todo");
        }
        Ok(deleted)
    }

    async fn delete_completed(&self) -> TodoResult<u64> {
        let mut state = self.state.write().await;
        let before = state.todos.len();
        state.todos.retain(|_, todo| !todo.completed);

        let deleted = (before - state.todos.len()) as u64;
        tracing::info!(deleted, "Cleared completed todos");
        Ok(deleted)
    }
}
