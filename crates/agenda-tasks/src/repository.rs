//! SQL data access layer for tasks.
//!
//! All methods take a `&Connection` parameter and are stateless — pure
//! functions that translate between Rust types and SQL. Transaction
//! boundaries are owned by the service layer; inside a transaction the
//! `&Connection` these methods receive is the transaction handle.
//!
//! Every row-returning method excludes soft-deleted tasks. Timestamps are
//! stored as RFC 3339 text with microsecond precision, so lexicographic
//! ordering equals chronological ordering.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{Result, TaskError};
use crate::types::{NewTask, Tag, Task, TaskPage, TaskPatch, TaskQuery};

/// Columns fetched for every task row, in [`task_from_row`] order.
const TASK_COLUMNS: &str =
    "id, title, description, priority, completed, due_date, created_at, updated_at";

/// Hard cap on page size, applied even if the caller skipped validation.
const MAX_PAGE_SIZE: u32 = 100;

/// Format the current UTC time for storage.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_date(raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let due_date: String = row.get("due_date")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
        completed: row.get("completed")?,
        due_date: parse_date(&due_date)?,
        tags: Vec::new(),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Task repository for SQL CRUD and listing operations.
pub struct TaskRepository;

impl TaskRepository {
    // ─────────────────────────────────────────────────────────────────────
    // Task CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a task row and return its assigned id.
    ///
    /// Tag associations are linked separately via [`Self::set_tags`].
    pub fn insert(conn: &Connection, new_task: &NewTask) -> Result<i64> {
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO tasks (title, description, priority, completed, due_date,
             is_deleted, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, 0, ?5, ?5)",
            params![
                new_task.title,
                new_task.description,
                new_task.priority,
                new_task.due_date.to_string(),
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch an active (non-deleted) task by id, tags included.
    ///
    /// Soft-deleted rows are indistinguishable from missing ones: both
    /// produce [`TaskError::TaskNotFound`].
    pub fn get_active(conn: &Connection, id: i64) -> Result<Task> {
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND is_deleted = 0"),
                params![id],
                task_from_row,
            )
            .optional()?;

        let mut task = task.ok_or(TaskError::TaskNotFound(id))?;
        task.tags = Self::tag_names_for(conn, id)?;
        Ok(task)
    }

    /// Overwrite the fields present in `patch`, refreshing `updated_at`.
    ///
    /// Tag replacement is handled by the service layer; this only touches
    /// task columns. An empty patch still refreshes `updated_at`.
    pub fn apply_patch(conn: &Connection, id: i64, patch: &TaskPatch) -> Result<()> {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref title) = patch.title {
            sets.push("title = ?");
            values.push(Box::new(title.clone()));
        }
        if let Some(ref description) = patch.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?");
            values.push(Box::new(priority));
        }
        if let Some(completed) = patch.completed {
            sets.push("completed = ?");
            values.push(Box::new(completed));
        }
        if let Some(due_date) = patch.due_date {
            sets.push("due_date = ?");
            values.push(Box::new(due_date.to_string()));
        }

        sets.push("updated_at = ?");
        values.push(Box::new(now_iso()));
        values.push(Box::new(id));

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = ? AND is_deleted = 0",
            sets.join(", ")
        );
        let params_refs: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;

        if changed == 0 {
            return Err(TaskError::TaskNotFound(id));
        }
        Ok(())
    }

    /// Mark an active task as deleted.
    ///
    /// The row and its tag associations remain; the task just stops being
    /// visible. A repeat call finds no active row and reports not-found.
    pub fn soft_delete(conn: &Connection, id: i64) -> Result<()> {
        let changed = conn.execute(
            "UPDATE tasks SET is_deleted = 1, updated_at = ?1 WHERE id = ?2 AND is_deleted = 0",
            params![now_iso(), id],
        )?;
        if changed == 0 {
            return Err(TaskError::TaskNotFound(id));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tag associations
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the task's entire association set with the given tags.
    pub fn set_tags(conn: &Connection, task_id: i64, tags: &[Tag]) -> Result<()> {
        let _ = conn.execute("DELETE FROM task_tags WHERE task_id = ?1", params![task_id])?;
        let mut stmt = conn.prepare("INSERT INTO task_tags (task_id, tag_id) VALUES (?1, ?2)")?;
        for tag in tags {
            let _ = stmt.execute(params![task_id, tag.id])?;
        }
        Ok(())
    }

    fn tag_names_for(conn: &Connection, task_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT t.name FROM task_tags tt
             JOIN tags t ON t.id = tt.tag_id
             WHERE tt.task_id = ?1
             ORDER BY t.name",
        )?;
        let names = stmt
            .query_map(params![task_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Load tag names for a whole page of tasks in one query.
    fn attach_tags(conn: &Connection, tasks: &mut [Task]) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; tasks.len()].join(", ");
        let sql = format!(
            "SELECT tt.task_id, t.name FROM task_tags tt
             JOIN tags t ON t.id = tt.tag_id
             WHERE tt.task_id IN ({placeholders})
             ORDER BY t.name"
        );
        let ids: Vec<Box<dyn ToSql>> = tasks
            .iter()
            .map(|task| Box::new(task.id) as Box<dyn ToSql>)
            .collect();
        let params_refs: Vec<&dyn ToSql> = ids.iter().map(AsRef::as_ref).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut by_task: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            let (task_id, name) = row?;
            by_task.entry(task_id).or_default().push(name);
        }
        for task in tasks.iter_mut() {
            if let Some(names) = by_task.remove(&task.id) {
                task.tags = names;
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Query engine
    // ─────────────────────────────────────────────────────────────────────

    /// List active tasks matching the query's filters, sorted and
    /// paginated, plus the total match count ignoring the page window.
    ///
    /// Predicates are built as one ordered list — `is_deleted = 0` always
    /// first, then each optional filter — and the count query runs over
    /// exactly the same list before LIMIT/OFFSET is applied. The tag
    /// filter uses an EXISTS subquery over the association table, so a
    /// task matching several filter tags still yields a single row.
    pub fn list(conn: &Connection, query: &TaskQuery) -> Result<TaskPage> {
        let mut conditions: Vec<String> = vec!["is_deleted = 0".to_string()];
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(completed) = query.filter.completed {
            conditions.push("completed = ?".to_string());
            values.push(Box::new(completed));
        }
        if let Some(priority) = query.filter.priority {
            conditions.push("priority = ?".to_string());
            values.push(Box::new(priority));
        }
        if let Some(ref tags) = query.filter.tags {
            if !tags.is_empty() {
                let placeholders = vec!["?"; tags.len()].join(", ");
                conditions.push(format!(
                    "EXISTS (SELECT 1 FROM task_tags tt
                     JOIN tags t ON t.id = tt.tag_id
                     WHERE tt.task_id = tasks.id AND lower(t.name) IN ({placeholders}))"
                ));
                for tag in tags {
                    values.push(Box::new(tag.trim().to_lowercase()));
                }
            }
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        // Count over the same predicates, before pagination
        let count_sql = format!("SELECT COUNT(*) FROM tasks {where_clause}");
        let count_params: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        let total: u64 = conn.query_row(&count_sql, count_params.as_slice(), |row| row.get(0))?;

        // Page query: sort, then window. Id is the tie-break so paging
        // stays stable when the sort column has equal values.
        let sort = query.sort_by.as_sql();
        let dir = query.order.as_sql();
        let data_sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks {where_clause}
             ORDER BY {sort} {dir}, id {dir}
             LIMIT ? OFFSET ?"
        );

        let mut data_values = values;
        data_values.push(Box::new(query.limit.clamp(1, MAX_PAGE_SIZE)));
        data_values.push(Box::new(query.offset));
        let data_params: Vec<&dyn ToSql> = data_values.iter().map(AsRef::as_ref).collect();

        let mut stmt = conn.prepare(&data_sql)?;
        let mut tasks = stmt
            .query_map(data_params.as_slice(), task_from_row)?
            .collect::<rusqlite::Result<Vec<Task>>>()?;

        Self::attach_tags(conn, &mut tasks)?;
        Ok(TaskPage {
            total,
            items: tasks,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::tags::TagRegistry;
    use crate::types::{SortKey, SortOrder, TaskFilter};

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn due(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            priority: 3,
            due_date: due("2027-03-01"),
            tags: Vec::new(),
        }
    }

    fn insert_with_tags(conn: &Connection, title: &str, tag_names: &[&str]) -> i64 {
        let id = TaskRepository::insert(conn, &new_task(title)).unwrap();
        if !tag_names.is_empty() {
            let names: Vec<String> = tag_names.iter().map(|s| (*s).to_string()).collect();
            let tags = TagRegistry::resolve(conn, &names).unwrap();
            TaskRepository::set_tags(conn, id, &tags).unwrap();
        }
        id
    }

    fn query() -> TaskQuery {
        TaskQuery {
            limit: 100,
            ..TaskQuery::default()
        }
    }

    // --- CRUD ---

    #[test]
    fn insert_and_get_round_trip() {
        let conn = setup_db();
        let id = TaskRepository::insert(
            &conn,
            &NewTask {
                title: "Write report".into(),
                description: Some("quarterly numbers".into()),
                priority: 2,
                due_date: due("2027-03-01"),
                tags: Vec::new(),
            },
        )
        .unwrap();

        let task = TaskRepository::get_active(&conn, id).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description.as_deref(), Some("quarterly numbers"));
        assert_eq!(task.priority, 2);
        assert!(!task.completed);
        assert_eq!(task.due_date, due("2027-03-01"));
        assert!(task.tags.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn get_missing_task_not_found() {
        let conn = setup_db();
        let err = TaskRepository::get_active(&conn, 999).unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound(999)));
    }

    #[test]
    fn get_excludes_soft_deleted() {
        let conn = setup_db();
        let id = TaskRepository::insert(&conn, &new_task("gone")).unwrap();
        TaskRepository::soft_delete(&conn, id).unwrap();
        let err = TaskRepository::get_active(&conn, id).unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound(_)));
    }

    #[test]
    fn repeat_soft_delete_not_found() {
        let conn = setup_db();
        let id = TaskRepository::insert(&conn, &new_task("gone")).unwrap();
        TaskRepository::soft_delete(&conn, id).unwrap();
        let err = TaskRepository::soft_delete(&conn, id).unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound(_)));
    }

    #[test]
    fn soft_delete_keeps_row_and_associations() {
        let conn = setup_db();
        let id = insert_with_tags(&conn, "keep", &["work"]);
        TaskRepository::soft_delete(&conn, id).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE id = ?1", params![id], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(rows, 1);
        let links: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM task_tags WHERE task_id = ?1",
                params![id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(links, 1);
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let conn = setup_db();
        let id = TaskRepository::insert(&conn, &new_task("before")).unwrap();

        TaskRepository::apply_patch(
            &conn,
            id,
            &TaskPatch {
                title: Some("after".into()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let task = TaskRepository::get_active(&conn, id).unwrap();
        assert_eq!(task.title, "after");
        assert_eq!(task.priority, 3);
        assert!(!task.completed);
        assert_eq!(task.due_date, due("2027-03-01"));
    }

    #[test]
    fn patch_advances_updated_at() {
        let conn = setup_db();
        let id = TaskRepository::insert(&conn, &new_task("tick")).unwrap();
        let before = TaskRepository::get_active(&conn, id).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        TaskRepository::apply_patch(
            &conn,
            id,
            &TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let after = TaskRepository::get_active(&conn, id).unwrap();
        assert!(after.completed);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn patch_clears_description_with_explicit_null() {
        let conn = setup_db();
        let id = TaskRepository::insert(
            &conn,
            &NewTask {
                description: Some("old".into()),
                ..new_task("desc")
            },
        )
        .unwrap();

        TaskRepository::apply_patch(
            &conn,
            id,
            &TaskPatch {
                description: Some(None),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let task = TaskRepository::get_active(&conn, id).unwrap();
        assert_eq!(task.description, None);
    }

    #[test]
    fn patch_missing_task_not_found() {
        let conn = setup_db();
        let err = TaskRepository::apply_patch(&conn, 999, &TaskPatch::default()).unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound(999)));
    }

    // --- Tag associations ---

    #[test]
    fn set_tags_replaces_association_set() {
        let conn = setup_db();
        let id = insert_with_tags(&conn, "retag", &["a", "b"]);

        let replacement = TagRegistry::resolve(&conn, &["c".to_string()]).unwrap();
        TaskRepository::set_tags(&conn, id, &replacement).unwrap();

        let task = TaskRepository::get_active(&conn, id).unwrap();
        assert_eq!(task.tags, vec!["c"]);
    }

    #[test]
    fn set_tags_empty_clears_all() {
        let conn = setup_db();
        let id = insert_with_tags(&conn, "untag", &["a", "b"]);
        TaskRepository::set_tags(&conn, id, &[]).unwrap();
        let task = TaskRepository::get_active(&conn, id).unwrap();
        assert!(task.tags.is_empty());
    }

    #[test]
    fn tags_load_sorted() {
        let conn = setup_db();
        let id = insert_with_tags(&conn, "sorted", &["zeta", "alpha"]);
        let task = TaskRepository::get_active(&conn, id).unwrap();
        assert_eq!(task.tags, vec!["alpha", "zeta"]);
    }

    // --- Query engine ---

    #[test]
    fn list_empty_store() {
        let conn = setup_db();
        let page = TaskRepository::list(&conn, &query()).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn list_excludes_soft_deleted() {
        let conn = setup_db();
        let keep = TaskRepository::insert(&conn, &new_task("keep")).unwrap();
        let gone = TaskRepository::insert(&conn, &new_task("gone")).unwrap();
        TaskRepository::soft_delete(&conn, gone).unwrap();

        let page = TaskRepository::list(&conn, &query()).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, keep);
    }

    #[test]
    fn list_filters_by_completed() {
        let conn = setup_db();
        let done = TaskRepository::insert(&conn, &new_task("done")).unwrap();
        let _open = TaskRepository::insert(&conn, &new_task("open")).unwrap();
        TaskRepository::apply_patch(
            &conn,
            done,
            &TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                filter: TaskFilter {
                    completed: Some(true),
                    ..TaskFilter::default()
                },
                ..query()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, done);
    }

    #[test]
    fn list_filters_by_priority() {
        let conn = setup_db();
        let _low = TaskRepository::insert(
            &conn,
            &NewTask {
                priority: 1,
                ..new_task("low")
            },
        )
        .unwrap();
        let high = TaskRepository::insert(
            &conn,
            &NewTask {
                priority: 5,
                ..new_task("high")
            },
        )
        .unwrap();

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                filter: TaskFilter {
                    priority: Some(5),
                    ..TaskFilter::default()
                },
                ..query()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, high);
    }

    #[test]
    fn list_filters_by_tag_membership() {
        let conn = setup_db();
        let tagged = insert_with_tags(&conn, "tagged", &["urgent"]);
        let _plain = TaskRepository::insert(&conn, &new_task("plain")).unwrap();

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                filter: TaskFilter {
                    tags: Some(vec!["URGENT".to_string()]),
                    ..TaskFilter::default()
                },
                ..query()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, tagged);
        assert_eq!(page.items[0].tags, vec!["urgent"]);
    }

    #[test]
    fn tag_filter_does_not_duplicate_tasks() {
        let conn = setup_db();
        let id = insert_with_tags(&conn, "both", &["a", "b"]);

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                filter: TaskFilter {
                    tags: Some(vec!["a".to_string(), "b".to_string()]),
                    ..TaskFilter::default()
                },
                ..query()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, id);
    }

    #[test]
    fn filters_combine_with_and() {
        let conn = setup_db();
        let _wrong_priority = insert_with_tags(&conn, "a", &["work"]);
        let target = TaskRepository::insert(
            &conn,
            &NewTask {
                priority: 5,
                ..new_task("b")
            },
        )
        .unwrap();
        let tags = TagRegistry::resolve(&conn, &["work".to_string()]).unwrap();
        TaskRepository::set_tags(&conn, target, &tags).unwrap();

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                filter: TaskFilter {
                    priority: Some(5),
                    tags: Some(vec!["work".to_string()]),
                    ..TaskFilter::default()
                },
                ..query()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, target);
    }

    #[test]
    fn total_independent_of_page_window() {
        let conn = setup_db();
        for i in 0..5 {
            TaskRepository::insert(&conn, &new_task(&format!("t{i}"))).unwrap();
        }

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                limit: 2,
                offset: 0,
                ..TaskQuery::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn offset_beyond_total_yields_empty_page_same_total() {
        let conn = setup_db();
        for i in 0..3 {
            TaskRepository::insert(&conn, &new_task(&format!("t{i}"))).unwrap();
        }

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                limit: 10,
                offset: 10,
                ..TaskQuery::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.items.is_empty());
    }

    #[test]
    fn pagination_pages_are_disjoint_and_exhaustive() {
        let conn = setup_db();
        for i in 0..5 {
            TaskRepository::insert(&conn, &new_task(&format!("t{i}"))).unwrap();
        }

        let mut seen = Vec::new();
        for page_no in 0..3 {
            let page = TaskRepository::list(
                &conn,
                &TaskQuery {
                    limit: 2,
                    offset: page_no * 2,
                    ..TaskQuery::default()
                },
            )
            .unwrap();
            seen.extend(page.items.iter().map(|t| t.id));
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn sort_by_priority_ascending() {
        let conn = setup_db();
        for priority in [4, 1, 3] {
            TaskRepository::insert(
                &conn,
                &NewTask {
                    priority,
                    ..new_task(&format!("p{priority}"))
                },
            )
            .unwrap();
        }

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                sort_by: SortKey::Priority,
                order: SortOrder::Asc,
                ..query()
            },
        )
        .unwrap();
        let priorities: Vec<i32> = page.items.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![1, 3, 4]);
    }

    #[test]
    fn sort_by_due_date_descending() {
        let conn = setup_db();
        for date in ["2027-01-01", "2027-06-01", "2027-03-01"] {
            TaskRepository::insert(
                &conn,
                &NewTask {
                    due_date: due(date),
                    ..new_task(date)
                },
            )
            .unwrap();
        }

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                sort_by: SortKey::DueDate,
                order: SortOrder::Desc,
                ..query()
            },
        )
        .unwrap();
        let dates: Vec<String> = page.items.iter().map(|t| t.due_date.to_string()).collect();
        assert_eq!(dates, vec!["2027-06-01", "2027-03-01", "2027-01-01"]);
    }

    #[test]
    fn equal_sort_keys_break_ties_by_id() {
        let conn = setup_db();
        // Same priority for all; id decides the order
        let ids: Vec<i64> = (0..3)
            .map(|i| TaskRepository::insert(&conn, &new_task(&format!("t{i}"))).unwrap())
            .collect();

        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                sort_by: SortKey::Priority,
                order: SortOrder::Asc,
                ..query()
            },
        )
        .unwrap();
        let listed: Vec<i64> = page.items.iter().map(|t| t.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn limit_is_clamped_to_cap() {
        let conn = setup_db();
        TaskRepository::insert(&conn, &new_task("one")).unwrap();

        // limit 0 would be an empty page forever; the store floors it to 1
        let page = TaskRepository::list(
            &conn,
            &TaskQuery {
                limit: 0,
                ..TaskQuery::default()
            },
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
    }
}
