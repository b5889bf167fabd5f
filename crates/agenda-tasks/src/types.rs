//! Domain types for tasks, tags, filtering, and pagination.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A task as returned by every task-producing operation.
///
/// Tags are always eagerly loaded as a flat, sorted list of lowercase
/// names. The soft-delete marker is internal to the store and never
/// exposed here — a soft-deleted task is simply not returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// System-assigned, immutable identifier.
    pub id: i64,
    /// Non-empty title, at most 200 characters.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Priority in the inclusive range `[1, 5]`.
    pub priority: i32,
    /// Completion state.
    pub completed: bool,
    /// Calendar date the task is due (no time component).
    pub due_date: NaiveDate,
    /// Lowercase tag names, sorted, without duplicates.
    pub tags: Vec<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating operation, including tag changes.
    pub updated_at: DateTime<Utc>,
}

/// A canonical tag row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// System-assigned identifier.
    pub id: i64,
    /// Lowercase, trimmed name, at most 50 characters. Unique
    /// case-insensitively across all tags.
    pub name: String,
}

/// Fields for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority in `[1, 5]`.
    pub priority: i32,
    /// Due date.
    pub due_date: NaiveDate,
    /// Raw tag names; normalized and de-duplicated by the tag registry.
    pub tags: Vec<String>,
}

/// A partial update. Fields left as `None` are untouched.
///
/// `description` is doubly optional so "not provided" (outer `None`) and
/// "explicitly cleared" (`Some(None)`) stay distinct. `tags` replaces the
/// whole association set when present — `Some(vec![])` clears all tags.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New title, if provided.
    pub title: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New priority, if provided.
    pub priority: Option<i32>,
    /// New completion state, if provided.
    pub completed: Option<bool>,
    /// New due date, if provided.
    pub due_date: Option<NaiveDate>,
    /// Replacement tag list, if provided.
    pub tags: Option<Vec<String>>,
}

/// Optional filters, AND-ed together over active tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Exact match on completion state.
    pub completed: Option<bool>,
    /// Exact match on priority.
    pub priority: Option<i32>,
    /// Tag membership: a task matches when it carries at least one tag
    /// whose lowercased name is in this set.
    pub tags: Option<Vec<String>>,
}

/// Sort column for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Sort by creation time (the default).
    #[default]
    CreatedAt,
    /// Sort by due date.
    DueDate,
    /// Sort by priority.
    Priority,
}

impl SortKey {
    /// The backing column name.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
        }
    }

    /// Parse a sort key, falling back to `created_at` for unknown input.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "due_date" => Self::DueDate,
            "priority" => Self::Priority,
            _ => Self::CreatedAt,
        }
    }
}

/// Sort direction for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending (the default).
    #[default]
    Desc,
}

impl SortOrder {
    /// The SQL direction keyword.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse a direction, falling back to descending for unknown input.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// One fully-specified listing request: filters, sort, and page window.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    /// Filter predicates.
    pub filter: TaskFilter,
    /// Sort column.
    pub sort_by: SortKey,
    /// Sort direction.
    pub order: SortOrder,
    /// Page size; clamped to `[1, 100]` by the store.
    pub limit: u32,
    /// Rows to skip after filtering and sorting.
    pub offset: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            filter: TaskFilter::default(),
            sort_by: SortKey::default(),
            order: SortOrder::default(),
            limit: 10,
            offset: 0,
        }
    }
}

/// One page of tasks plus the total match count ignoring pagination.
#[derive(Debug, Clone, Serialize)]
pub struct TaskPage {
    /// Count of all rows matching the filters, before limit/offset.
    pub total: u64,
    /// The page window, in sort order.
    pub items: Vec<Task>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
