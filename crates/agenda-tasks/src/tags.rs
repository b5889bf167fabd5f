//! Tag registry: canonical, case-insensitively unique tag rows.
//!
//! All tag names pass through [`normalize`] before touching the database,
//! so stored names are always trimmed and lowercase. Creation races with
//! other writers on the `uq_tags_name_lower` index are absorbed by
//! re-querying for the winning row.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::errors::{is_unique_violation, Result, TaskError};
use crate::types::Tag;

/// Longest allowed tag name, matching the column CHECK constraint.
const MAX_TAG_LEN: usize = 50;

/// Normalize a raw tag name: trim surrounding whitespace and lowercase.
///
/// # Errors
///
/// Returns [`TaskError::InvalidArgument`] when the name is empty after
/// trimming or longer than 50 characters.
pub fn normalize(raw: &str) -> Result<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(TaskError::invalid("tag name is empty after trimming"));
    }
    if name.chars().count() > MAX_TAG_LEN {
        return Err(TaskError::invalid(format!(
            "tag name exceeds {MAX_TAG_LEN} characters: {name:?}"
        )));
    }
    Ok(name)
}

/// Resolves raw tag strings to existing-or-newly-created tag rows.
pub struct TagRegistry;

impl TagRegistry {
    /// Resolve a list of raw tag names to canonical tag rows, creating
    /// rows for names not already present.
    ///
    /// Duplicates in the input collapse to one entry per normalized name.
    /// The result is sorted by name. Runs against the caller's connection,
    /// so inside a transaction the inserts commit (or roll back) with the
    /// rest of the caller's operation.
    pub fn resolve(conn: &Connection, names: &[String]) -> Result<Vec<Tag>> {
        let mut normalized = BTreeSet::new();
        for raw in names {
            let _ = normalized.insert(normalize(raw)?);
        }

        let mut tags = Vec::with_capacity(normalized.len());
        for name in &normalized {
            tags.push(Self::resolve_one(conn, name)?);
        }
        Ok(tags)
    }

    fn resolve_one(conn: &Connection, name: &str) -> Result<Tag> {
        if let Some(tag) = Self::find(conn, name)? {
            return Ok(tag);
        }

        match conn.execute("INSERT INTO tags (name) VALUES (?1)", params![name]) {
            Ok(_) => Ok(Tag {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => {
                // Lost a creation race; the winning row exists now.
                debug!(name, "tag insert conflicted, re-querying");
                Self::find(conn, name)?.ok_or_else(|| {
                    TaskError::Internal(format!(
                        "tag {name:?} missing after unique-constraint conflict"
                    ))
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find(conn: &Connection, name: &str) -> Result<Option<Tag>> {
        let tag = conn
            .query_row(
                "SELECT id, name FROM tags WHERE lower(name) = ?1",
                params![name],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
