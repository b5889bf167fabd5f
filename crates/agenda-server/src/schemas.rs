//! Request and response schemas for the task API.
//!
//! Validation mirrors the store's own rules plus the API-only ones
//! (title bounds, no past due dates, page-size limits). The store
//! re-checks what it cares about; these checks exist so bad requests
//! fail before a connection is taken from the pool.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use agenda_tasks::{NewTask, SortKey, SortOrder, Task, TaskFilter, TaskPatch, TaskQuery};

/// Largest accepted `limit` query parameter.
const MAX_LIMIT: u32 = 100;

/// Longest accepted title.
const MAX_TITLE_LEN: usize = 200;

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".into());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("title exceeds {MAX_TITLE_LEN} characters"));
    }
    Ok(())
}

fn validate_priority(priority: i32) -> Result<(), String> {
    if !(1..=5).contains(&priority) {
        return Err(format!("priority must be between 1 and 5, got {priority}"));
    }
    Ok(())
}

fn validate_due_date(due_date: NaiveDate) -> Result<(), String> {
    if due_date < Utc::now().date_naive() {
        return Err("due_date cannot be in the past".into());
    }
    Ok(())
}

/// Deserialize a field where "absent" and "explicit null" differ:
/// the outer `Option` is populated only when the key is present.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/v1/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreate {
    /// Task title, 1–200 characters.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Priority in `[1, 5]`.
    pub priority: i32,
    /// Due date, today or later.
    pub due_date: NaiveDate,
    /// Raw tag names.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TaskCreate {
    /// Validate the payload against the API rules.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_priority(self.priority)?;
        validate_due_date(self.due_date)?;
        Ok(())
    }

    /// Convert into the store's creation type.
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            tags: self.tags,
        }
    }
}

/// Body of `PATCH /api/v1/tasks/{id}`. Absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    /// New title, if provided.
    pub title: Option<String>,
    /// New description; an explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// New priority, if provided.
    pub priority: Option<i32>,
    /// New completion state, if provided.
    pub completed: Option<bool>,
    /// New due date, if provided.
    pub due_date: Option<NaiveDate>,
    /// Replacement tag list; an empty list clears all tags.
    pub tags: Option<Vec<String>>,
}

impl TaskUpdate {
    /// Validate the provided fields against the API rules.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref title) = self.title {
            validate_title(title)?;
        }
        if let Some(priority) = self.priority {
            validate_priority(priority)?;
        }
        if let Some(due_date) = self.due_date {
            validate_due_date(due_date)?;
        }
        Ok(())
    }

    /// Convert into the store's patch type.
    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: self.title,
            description: self.description,
            priority: self.priority,
            completed: self.completed,
            due_date: self.due_date,
            tags: self.tags,
        }
    }
}

/// Query parameters of `GET /api/v1/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Exact match on completion state.
    pub completed: Option<bool>,
    /// Exact match on priority.
    pub priority: Option<i32>,
    /// CSV list of tags; a task matches when it carries at least one.
    pub tags: Option<String>,
    /// Sort column: `created_at`, `due_date`, or `priority`.
    pub sort_by: Option<String>,
    /// Sort direction: `asc` or `desc`.
    pub order: Option<String>,
    /// Page size, 1–100 (default 10).
    pub limit: Option<u32>,
    /// Rows to skip (default 0).
    pub offset: Option<u32>,
}

impl ListParams {
    /// Validate and convert into the store's query object.
    ///
    /// Unknown `sort_by`/`order` values are rejected here (the store
    /// itself would fall back to defaults for non-HTTP callers).
    pub fn into_query(self) -> Result<TaskQuery, String> {
        let sort_by = match self.sort_by.as_deref() {
            None => SortKey::default(),
            Some(raw @ ("created_at" | "due_date" | "priority")) => SortKey::parse_or_default(raw),
            Some(other) => return Err(format!("unknown sort_by: {other:?}")),
        };
        let order = match self.order.as_deref() {
            None => SortOrder::default(),
            Some(raw @ ("asc" | "desc")) => SortOrder::parse_or_default(raw),
            Some(other) => return Err(format!("unknown order: {other:?}")),
        };

        let limit = self.limit.unwrap_or(10);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("limit must be between 1 and {MAX_LIMIT}"));
        }

        let tags = self.tags.and_then(|csv| {
            let names: Vec<String> = csv
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() { None } else { Some(names) }
        });

        Ok(TaskQuery {
            filter: TaskFilter {
                completed: self.completed,
                priority: self.priority,
                tags,
            },
            sort_by,
            order,
            limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// Response envelope of `GET /api/v1/tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedTasks {
    /// Count of all matching rows, ignoring pagination.
    pub total: u64,
    /// The page size that was applied.
    pub limit: u32,
    /// The offset that was applied.
    pub offset: u32,
    /// The page of tasks, in sort order.
    pub items: Vec<Task>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
