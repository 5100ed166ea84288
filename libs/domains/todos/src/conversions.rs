//! Todo ↔ protobuf conversions for the read-only gRPC projection.

use rpc::todos::v1::{TodoItem, TodoList};

use crate::models::Todo;

impl From<Todo> for TodoItem {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            priority: todo.priority.as_i32(),
            completed: todo.completed,
        }
    }
}

/// Build a `TodoList` whose `count` is the number of items it carries.
pub fn todo_list(todos: Vec<Todo>) -> TodoList {
    let todos: Vec<TodoItem> = todos.into_iter().map(TodoItem::from).collect();
    TodoList {
        count: i32::try_from(todos.len()).unwrap_or(i32::MAX),
        todos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoPriority;
    use chrono::Utc;

    #[test]
    fn test_todo_list_counts_items() {
        let now = Utc::now();
        let todos = (1..=3)
            .map(|id| Todo {
                id,
                title: format!("t{}", id),
                priority: TodoPriority::Low,
                completed: id == 2,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let list = todo_list(todos);
        assert_eq!(list.count, 3);
        assert_eq!(list.todos[1].id, 2);
        assert_eq!(list.todos[1].priority, 3);
        assert!(list.todos[1].completed);
    }

    #[test]
    fn test_empty_list() {
        let list = todo_list(Vec::new());
        assert_eq!(list.count, 0);
        assert!(list.todos.is_empty());
    }
}
