use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::Display;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// Todo priority. Stored and serialized as its integer value (1 = high).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[strum(serialize_all = "lowercase")]
pub enum TodoPriority {
    #[sea_orm(num_value = 1)]
    High,
    /// Default priority
    #[default]
    #[sea_orm(num_value = 2)]
    Medium,
    #[sea_orm(num_value = 3)]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("priority must be 1, 2 or 3, got {0}")]
pub struct InvalidPriority(pub i32);

impl TodoPriority {
    pub fn as_i32(self) -> i32 {
        match self {
            TodoPriority::High => 1,
            TodoPriority::Medium => 2,
            TodoPriority::Low => 3,
        }
    }
}

impl TryFrom<i32> for TodoPriority {
    type Error = InvalidPriority;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TodoPriority::High),
            2 => Ok(TodoPriority::Medium),
            3 => Ok(TodoPriority::Low),
            other => Err(InvalidPriority(other)),
        }
    }
}

impl Serialize for TodoPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

impl<'de> Deserialize<'de> for TodoPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i32::deserialize(deserializer)?;
        TodoPriority::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Todo entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    /// 1 = high, 2 = medium, 3 = low
    #[schema(value_type = i32, minimum = 1, maximum = 3)]
    pub priority: TodoPriority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Surrounding whitespace is not part of a title.
fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

/// Postgres text columns cannot hold NUL.
fn no_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut error = ValidationError::new("null_character");
        error.message = Some("Null characters are not allowed".into());
        return Err(error);
    }
    Ok(())
}

/// Body of `POST /todos/`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateTodo {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1, max = 255), custom(function = "no_nul"))]
    #[schema(min_length = 1, max_length = 255)]
    pub title: Option<String>,

    /// Defaults to 2 (medium)
    #[validate(range(min = 1, max = 3))]
    #[schema(minimum = 1, maximum = 3)]
    pub priority: Option<i32>,

    /// Defaults to false
    pub completed: Option<bool>,
}

/// Body of `PUT /todos/{id}/`: every field is required.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ReplaceTodo {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required, length(min = 1, max = 255), custom(function = "no_nul"))]
    #[schema(min_length = 1, max_length = 255)]
    pub title: Option<String>,

    #[validate(required, range(min = 1, max = 3))]
    #[schema(minimum = 1, maximum = 3)]
    pub priority: Option<i32>,

    #[validate(required)]
    pub completed: Option<bool>,
}

/// Body of `PATCH /todos/{id}/`: only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 255), custom(function = "no_nul"))]
    #[schema(min_length = 1, max_length = 255)]
    pub title: Option<String>,

    #[validate(range(min = 1, max = 3))]
    #[schema(minimum = 1, maximum = 3)]
    pub priority: Option<i32>,

    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearCompletedResponse {
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
    pub message: String,
}

impl ClearCompletedResponse {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            deleted_count,
            message: format!("{} completed todo(s) deleted", deleted_count),
        }
    }
}

/// A validated todo ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub priority: TodoPriority,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: TodoPriority::default(),
            completed: false,
        }
    }

    pub fn with_priority(mut self, priority: TodoPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Field overwrites for an existing todo. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub priority: Option<TodoPriority>,
    pub completed: Option<bool>,
}

fn priority_field(value: Option<i32>) -> Result<Option<TodoPriority>, ValidationErrors> {
    value
        .map(TodoPriority::try_from)
        .transpose()
        .map_err(|InvalidPriority(value)| {
            let mut error = ValidationError::new("range");
            error.add_param("value".into(), &value);
            error.add_param("min".into(), &1);
            error.add_param("max".into(), &3);

            let mut errors = ValidationErrors::new();
            errors.add("priority", error);
            errors
        })
}

fn required_field(field: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new("required"));
    errors
}

impl TryFrom<CreateTodo> for NewTodo {
    type Error = ValidationErrors;

    fn try_from(input: CreateTodo) -> Result<Self, Self::Error> {
        input.validate()?;

        let title = input.title.ok_or_else(|| required_field("title"))?;
        let mut todo = NewTodo::new(title).with_completed(input.completed.unwrap_or(false));
        if let Some(priority) = priority_field(input.priority)? {
            todo = todo.with_priority(priority);
        }
        Ok(todo)
    }
}

impl TryFrom<ReplaceTodo> for TodoChanges {
    type Error = ValidationErrors;

    fn try_from(input: ReplaceTodo) -> Result<Self, Self::Error> {
        input.validate()?;

        Ok(TodoChanges {
            title: Some(input.title.ok_or_else(|| required_field("title"))?),
            priority: Some(
                priority_field(input.priority)?.ok_or_else(|| required_field("priority"))?,
            ),
            completed: Some(input.completed.ok_or_else(|| required_field("completed"))?),
        })
    }
}

impl TryFrom<UpdateTodo> for TodoChanges {
    type Error = ValidationErrors;

    fn try_from(input: UpdateTodo) -> Result<Self, Self::Error> {
        input.validate()?;

        Ok(TodoChanges {
            title: input.title,
            priority: priority_field(input.priority)?,
            completed: input.completed,
        })
    }
}
