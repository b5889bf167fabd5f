//! Business logic layer for task management.
//!
//! Wraps the repository and tag registry with defensive validation and
//! the transaction boundary. Every mutation runs inside one `BEGIN
//! IMMEDIATE` transaction, so tag resolution and task mutation are never
//! observable as separate commits, and concurrent writers queue on the
//! busy timeout instead of failing on snapshot upgrades.
//!
//! Validation here does not trust the API layer: priority bounds and tag
//! names are re-checked even though request schemas validate them first.

use rusqlite::{Connection, TransactionBehavior};
use tracing::debug;

use crate::errors::{Result, TaskError};
use crate::repository::TaskRepository;
use crate::tags::TagRegistry;
use crate::types::{NewTask, Task, TaskPage, TaskPatch, TaskQuery};

fn validate_priority(priority: i32) -> Result<()> {
    if !(1..=5).contains(&priority) {
        return Err(TaskError::invalid(format!(
            "priority must be between 1 and 5, got {priority}"
        )));
    }
    Ok(())
}

/// Task service: validation plus transactional orchestration.
pub struct TaskService;

impl TaskService {
    /// Create a task, resolving and linking its tags atomically.
    pub fn create(conn: &mut Connection, new_task: &NewTask) -> Result<Task> {
        validate_priority(new_task.priority)?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = TaskRepository::insert(&tx, new_task)?;
        if !new_task.tags.is_empty() {
            let tags = TagRegistry::resolve(&tx, &new_task.tags)?;
            TaskRepository::set_tags(&tx, id, &tags)?;
        }
        let task = TaskRepository::get_active(&tx, id)?;
        tx.commit()?;

        debug!(task_id = task.id, "task created");
        Ok(task)
    }

    /// Fetch an active task by id.
    pub fn get(conn: &Connection, id: i64) -> Result<Task> {
        TaskRepository::get_active(conn, id)
    }

    /// Apply a partial update; fields absent from the patch are untouched.
    ///
    /// When `tags` is present the whole association set is replaced —
    /// an empty list clears every tag. `updated_at` is refreshed either
    /// way.
    pub fn update(conn: &mut Connection, id: i64, patch: &TaskPatch) -> Result<Task> {
        if let Some(priority) = patch.priority {
            validate_priority(priority)?;
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        TaskRepository::apply_patch(&tx, id, patch)?;
        if let Some(ref names) = patch.tags {
            let tags = if names.is_empty() {
                Vec::new()
            } else {
                TagRegistry::resolve(&tx, names)?
            };
            TaskRepository::set_tags(&tx, id, &tags)?;
        }
        let task = TaskRepository::get_active(&tx, id)?;
        tx.commit()?;

        debug!(task_id = id, "task updated");
        Ok(task)
    }

    /// Soft-delete an active task. A repeat call reports not-found.
    pub fn delete(conn: &mut Connection, id: i64) -> Result<()> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        TaskRepository::soft_delete(&tx, id)?;
        tx.commit()?;

        debug!(task_id = id, "task soft-deleted");
        Ok(())
    }

    /// List active tasks; see [`TaskRepository::list`].
    pub fn list(conn: &Connection, query: &TaskQuery) -> Result<TaskPage> {
        TaskRepository::list(conn, query)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
