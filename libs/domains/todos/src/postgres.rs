use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    UpdateMany,
};

use crate::{
    entity,
    error::TodoResult,
    models::{NewTodo, Todo, TodoChanges},
    query::{SortKey, TodoQuery},
    repository::TodoRepository,
};

/// `updated_at` for a mutation: `now`, or one microsecond past the stored
/// value when the clock has not advanced beyond it.
const BUMP_UPDATED_AT: &str = "GREATEST($1, updated_at + INTERVAL '1 microsecond')";

const TITLE_LIKE: &str = "LOWER(title) LIKE $1";

pub struct PgTodoRepository {
    db: DatabaseConnection,
}

impl PgTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn update_one(id: i64, now: DateTime<Utc>) -> UpdateMany<entity::Entity> {
        entity::Entity::update_many()
            .col_expr(
                entity::Column::UpdatedAt,
                Expr::cust_with_values(BUMP_UPDATED_AT, [now]),
            )
            .filter(entity::Column::Id.eq(id))
    }
}

fn column(key: SortKey) -> entity::Column {
    match key {
        SortKey::Priority => entity::Column::Priority,
        SortKey::CreatedAt => entity::Column::CreatedAt,
        SortKey::Id => entity::Column::Id,
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(&self, input: NewTodo) -> TodoResult<Todo> {
        let model = entity::ActiveModel::from_new(input, Utc::now())
            .insert(&self.db)
            .await?;

        tracing::info!(todo_id = model.id, "Created todo");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> TodoResult<Option<Todo>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, query: &TodoQuery) -> TodoResult<Vec<Todo>> {
        let mut select = entity::Entity::find();

        if let Some(completed) = query.completed {
            select = select.filter(entity::Column::Completed.eq(completed));
        }
        if let Some(priority) = query.priority {
            select = select.filter(entity::Column::Priority.eq(priority.as_i32()));
        }
        if let Some(pattern) = query.search_pattern() {
            select = select.filter(Expr::cust_with_values(TITLE_LIKE, [pattern]));
        }

        for field in query.effective_ordering() {
            let order = if field.descending {
                Order::Desc
            } else {
                Order::Asc
            };
            select = select.order_by(column(field.key), order);
        }

        let models = select.all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> TodoResult<Option<Todo>> {
        let mut update = Self::update_one(id, Utc::now());

        if let Some(title) = changes.title {
            update = update.col_expr(entity::Column::Title, Expr::value(title));
        }
        if let Some(priority) = changes.priority {
            update = update.col_expr(entity::Column::Priority, Expr::value(priority.as_i32()));
        }
        if let Some(completed) = changes.completed {
            update = update.col_expr(entity::Column::Completed, Expr::value(completed));
        }

        let updated = update.exec_with_returning(&self.db).await?;
        let todo = updated.into_iter().next().map(Todo::from);

        if todo.is_some() {
            tracing::info!(todo_id = id, "Updated todo");
        }
        Ok(todo)
    }

    async fn toggle(&self, id: i64) -> TodoResult<Option<Todo>> {
        let updated = Self::update_one(id, Utc::now())
            .col_expr(entity::Column::Completed, Expr::cust("NOT completed"))
            .exec_with_returning(&self.db)
            .await?;
        let todo = updated.into_iter().next().map(Todo::from);

        if let Some(todo) = &todo {
            tracing::info!(todo_id = id, completed = todo.completed, "Toggled todo");
        }
        Ok(todo)
    }

    async fn delete(&self, id: i64) -> TodoResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(todo_id = id, "Deleted todo");
        }
        Ok(deleted)
    }

    async fn delete_completed(&self) -> TodoResult<u64> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::Completed.eq(true))
            .exec(&self.db)
            .await?;

        tracing::info!(deleted = result.rows_affected, "Cleared completed todos");
        Ok(result.rows_affected)
    }
}
