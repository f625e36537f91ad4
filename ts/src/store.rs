//! Core TaskStore implementation
//!
//! SQLite-backed CRUD and query primitives. Every query is scoped by
//! `owner_id`; a record is invisible to any other owner.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::now_ms;
use crate::task::{NewTask, Task, assemble};

/// Errors from store operations (the persistence failure class)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id           TEXT PRIMARY KEY,
    owner_id     TEXT NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    priority     TEXT NOT NULL,
    status       TEXT NOT NULL,
    due_date     INTEGER,
    completed_at INTEGER,
    created_at   INTEGER NOT NULL,
    updated_at   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_owner_created ON tasks(owner_id, created_at DESC);
";

const SELECT_COLS: &str =
    "id, owner_id, title, description, priority, status, due_date, completed_at, created_at, updated_at";

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let parse_col = |idx: usize, e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    };
    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: row.get::<_, String>(4)?.parse().map_err(|e| parse_col(4, e))?,
        status: row.get::<_, String>(5)?.parse().map_err(|e| parse_col(5, e))?,
        due_date: row.get(6)?,
        completed_at: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// The durable task store, owning a single SQLite connection
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open or create a task store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "Opened task store");
        Ok(Self { conn })
    }

    /// Open an in-memory store (tests, throwaway usage)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Persist a new task, assigning id and timestamps
    pub fn insert(&self, new: NewTask) -> Result<Task, StoreError> {
        let id = Uuid::now_v7().to_string();
        let task = assemble(new, id, now_ms());
        self.conn.execute(
            "INSERT INTO tasks (id, owner_id, title, description, priority, status, due_date, completed_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id,
                task.owner_id,
                task.title,
                task.description,
                task.priority.to_string(),
                task.status.to_string(),
                task.due_date,
                task.completed_at,
                task.created_at,
                task.updated_at,
            ],
        )?;
        info!(task_id = %task.id, owner_id = %task.owner_id, "Inserted task");
        Ok(task)
    }

    /// List an owner's tasks, newest first, optionally narrowed by a
    /// case-insensitive substring match over title or description.
    /// An empty filter is treated as no filter.
    pub fn list_by_owner(&self, owner_id: &str, filter_text: Option<&str>) -> Result<Vec<Task>, StoreError> {
        // UUIDv7 ids are time-ordered, so id breaks created_at ties
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM tasks WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_task)?;
        let mut tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        if let Some(needle) = filter_text.filter(|t| !t.is_empty()) {
            let needle = needle.to_lowercase();
            tasks.retain(|task| {
                task.title.to_lowercase().contains(&needle) || task.description.to_lowercase().contains(&needle)
            });
        }

        debug!(owner_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Fetch a task by id, only if owned by `owner_id`.
    /// Absence is a valid outcome here, not an error.
    pub fn find_owned(&self, id: &str, owner_id: &str) -> Result<Option<Task>, StoreError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1 AND owner_id = ?2"),
                params![id, owner_id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Overwrite the mutable fields of an existing record and bump
    /// updated_at. A concurrently removed record makes this a no-op;
    /// last-writer-wins is the accepted consistency model.
    pub fn replace(&self, task: &Task) -> Result<Task, StoreError> {
        let now = now_ms();
        self.conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, priority = ?3, status = ?4,
                    due_date = ?5, completed_at = ?6, updated_at = ?7
             WHERE id = ?8 AND owner_id = ?9",
            params![
                task.title,
                task.description,
                task.priority.to_string(),
                task.status.to_string(),
                task.due_date,
                task.completed_at,
                now,
                task.id,
                task.owner_id,
            ],
        )?;
        debug!(task_id = %task.id, "Replaced task");
        let mut updated = task.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    /// Delete a task by id if owned by `owner_id`.
    /// Returns true when a record existed and was removed.
    pub fn delete_owned(&self, id: &str, owner_id: &str) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2", params![id, owner_id])?;
        if removed > 0 {
            info!(task_id = %id, owner_id, "Deleted task");
        }
        Ok(removed > 0)
    }
}
