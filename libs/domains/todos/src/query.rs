//! Filter, search and ordering parameters for listing todos.
//!
//! Both repositories interpret a [`TodoQuery`] the same way: the Postgres
//! implementation translates it to SQL, the in-memory one uses
//! [`TodoQuery::matches`] and [`TodoQuery::compare`].

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::{TodoError, TodoResult};
use crate::models::{Todo, TodoPriority};

/// Columns a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Priority,
    CreatedAt,
    Id,
}

impl SortKey {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "priority" => Some(SortKey::Priority),
            "created_at" => Some(SortKey::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub key: SortKey,
    pub descending: bool,
}

impl SortField {
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            descending: false,
        }
    }

    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            descending: true,
        }
    }
}

const DEFAULT_ORDERING: [SortField; 3] = [
    SortField {
        key: SortKey::Priority,
        descending: false,
    },
    SortField {
        key: SortKey::CreatedAt,
        descending: true,
    },
    SortField {
        key: SortKey::Id,
        descending: true,
    },
];

const PARAMETERS: [&str; 4] = ["completed", "priority", "search", "ordering"];

/// Parsed list parameters. `Default` lists everything in default order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub completed: Option<bool>,
    pub priority: Option<TodoPriority>,
    /// Trimmed, never empty
    pub search: Option<String>,
    ordering: Vec<SortField>,
}

impl TodoQuery {
    /// Parse raw query-string pairs.
    ///
    /// Unknown or repeated parameters are rejected; empty values are ignored.
    /// A search term containing NUL is rejected.
    pub fn from_params<K, V>(params: &[(K, V)]) -> TodoResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut query = TodoQuery::default();

        for (name, value) in params {
            let name = name.as_ref();
            if !PARAMETERS.contains(&name) {
                return Err(TodoError::InvalidQuery(format!(
                    "Unknown query parameter '{}'",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(TodoError::InvalidQuery(format!(
                    "Query parameter '{}' given more than once",
                    name
                )));
            }

            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            match name {
                "completed" => query.completed = Some(parse_bool(value)?),
                "priority" => query.priority = Some(parse_priority(value)?),
                "search" => query.search = Some(parse_search(value)?),
                _ => query.ordering = parse_ordering(value)?,
            }
        }

        Ok(query)
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn with_priority(mut self, priority: TodoPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into().trim().to_string();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    pub fn with_ordering(mut self, ordering: Vec<SortField>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sort fields to apply, tie-break on `id` included.
    ///
    /// The default is priority ascending, newest first, then `id` descending.
    /// An explicit ordering is followed by `id` ascending.
    pub fn effective_ordering(&self) -> Vec<SortField> {
        if self.ordering.is_empty() {
            return DEFAULT_ORDERING.to_vec();
        }

        let mut ordering = self.ordering.clone();
        ordering.push(SortField::asc(SortKey::Id));
        ordering
    }

    /// `LIKE` pattern for a case-insensitive substring match on the lowercased
    /// title, with `\`, `%` and `_` matched literally.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for c in term.to_lowercase().chars() {
                if matches!(c, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.completed.is_none_or(|completed| todo.completed == completed)
            && self.priority.is_none_or(|priority| todo.priority == priority)
            && self.search.as_ref().is_none_or(|term| {
                todo.title
                    .to_lowercase()
                    .contains(term.to_lowercase().as_str())
            })
    }

    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        self.effective_ordering()
            .iter()
            .map(|field| {
                let ordering = match field.key {
                    SortKey::Priority => a.priority.cmp(&b.priority),
                    SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortKey::Id => a.id.cmp(&b.id),
                };
                if field.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

fn parse_bool(value: &str) -> TodoResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(TodoError::InvalidQuery(format!(
            "'completed' must be true, false, 1 or 0, got '{}'",
            value
        ))),
    }
}

fn parse_search(value: &str) -> TodoResult<String> {
    if value.contains('\0') {
        return Err(TodoError::InvalidQuery(
            "'search' must not contain null characters".to_string(),
        ));
    }
    Ok(value.to_string())
}

fn parse_priority(value: &str) -> TodoResult<TodoPriority> {
    value
        .parse::<i32>()
        .ok()
        .and_then(|n| TodoPriority::try_from(n).ok())
        .ok_or_else(|| {
            TodoError::InvalidQuery(format!("'priority' must be 1, 2 or 3, got '{}'", value))
        })
}

fn parse_ordering(value: &str) -> TodoResult<Vec<SortField>> {
    let mut ordering: Vec<SortField> = Vec::new();

    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (descending, name) = match part.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, part),
        };

        let key = SortKey::parse(name).ok_or_else(|| {
            TodoError::InvalidQuery(format!("Unknown ordering key '{}'", name))
        })?;
        if ordering.iter().any(|field| field.key == key) {
            return Err(TodoError::InvalidQuery(format!(
                "Ordering key '{}' given more than once",
                name
            )));
        }

        ordering.push(SortField { key, descending });
    }

    Ok(ordering)
}
