use crate::models::{NewTodo, TodoPriority};
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the todos table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub priority: TodoPriority,
    pub completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Todo {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            priority: model.priority,
            completed: model.completed,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    /// Insert model for a new todo; both timestamps start at `now`.
    pub fn from_new(input: NewTodo, now: DateTime<Utc>) -> Self {
        ActiveModel {
            id: NotSet,
            title: Set(input.title),
            priority: Set(input.priority),
            completed: Set(input.completed),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
