//! Task lifecycle engine
//!
//! Business rules layered over TaskStore: creation defaults, pure
//! field-level merge of update patches, derivation of `completed_at`
//! from status transitions, and conversion of missing-or-foreign
//! records into NotFound.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use taskstore::{NewTask, Priority, StoreError, Task, TaskStatus, TaskStore, now_ms};

/// Errors from engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing input; the caller corrects and retries
    #[error("validation failed: {0}")]
    Validation(String),

    /// Task does not exist or belongs to another owner. The two cases
    /// are indistinguishable so existence never leaks across owners.
    #[error("task not found: {0}")]
    NotFound(String),

    /// Underlying store failure, surfaced as-is
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for creating a task. Missing fields take the documented
/// defaults: empty description, medium priority, no deadline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<i64>,
}

/// Field-level patch for updating a task. Absent fields are left
/// unchanged. `completed_at` is not representable here at all: it is
/// derived from the status transition, never accepted as input (a wire
/// patch carrying it is ignored).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// `Some(None)` clears the deadline; absent leaves it unchanged
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<i64>>,
}

// Wire `null` must become Some(None) rather than None, so that a null
// deadline clears while an absent field preserves.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// Pure merge: produce a new record with this patch's fields laid
    /// over `current`. Never mutates, never touches `completed_at`.
    pub fn apply(&self, current: &Task) -> Task {
        Task {
            id: current.id.clone(),
            owner_id: current.owner_id.clone(),
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            description: self.description.clone().unwrap_or_else(|| current.description.clone()),
            priority: self.priority.unwrap_or(current.priority),
            status: self.status.unwrap_or(current.status),
            due_date: self.due_date.unwrap_or(current.due_date),
            completed_at: current.completed_at,
            created_at: current.created_at,
            updated_at: current.updated_at,
        }
    }
}

/// Completion timestamp rule. All status transitions are legal; only
/// crossing the Completed boundary changes the timestamp:
/// entering Completed stamps `now`, leaving it clears, anything else
/// (including Completed -> Completed) preserves the existing value.
fn derive_completed_at(previous: TaskStatus, next: TaskStatus, current: Option<i64>, now: i64) -> Option<i64> {
    let was_completed = previous == TaskStatus::Completed;
    let is_completed = next == TaskStatus::Completed;
    match (was_completed, is_completed) {
        (false, true) => Some(now),
        (true, false) => None,
        _ => current,
    }
}

/// Stateless lifecycle layer over an explicitly passed TaskStore.
/// Trusts the owner identity it is given; authentication happens
/// upstream.
pub struct TaskEngine {
    store: TaskStore,
}

impl TaskEngine {
    /// Build an engine over an opened store
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Create a task for `owner_id`, applying defaults for absent fields
    pub fn create(&self, owner_id: &str, draft: TaskDraft) -> Result<Task, EngineError> {
        if draft.title.trim().is_empty() {
            return Err(EngineError::Validation("title must not be blank".to_string()));
        }
        debug!(owner_id, title = %draft.title, "create: called");

        let mut new = NewTask::new(owner_id, draft.title);
        if let Some(description) = draft.description {
            new = new.with_description(description);
        }
        if let Some(priority) = draft.priority {
            new = new.with_priority(priority);
        }
        if let Some(due_date) = draft.due_date {
            new = new.with_due_date(due_date);
        }
        Ok(self.store.insert(new)?)
    }

    /// List `owner_id`'s tasks, newest first, optionally filtered by
    /// a search string. Pure delegation to the store.
    pub fn list(&self, owner_id: &str, search: Option<&str>) -> Result<Vec<Task>, EngineError> {
        debug!(owner_id, ?search, "list: called");
        Ok(self.store.list_by_owner(owner_id, search)?)
    }

    /// Apply a patch to an owned task: load, merge, derive
    /// `completed_at`, validate, persist. Nothing is considered
    /// changed unless the whole sequence succeeds.
    pub fn update(&self, owner_id: &str, id: &str, patch: TaskPatch) -> Result<Task, EngineError> {
        debug!(owner_id, id, "update: called");
        let current = self
            .store
            .find_owned(id, owner_id)?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let previous_status = current.status;

        let mut merged = patch.apply(&current);
        merged.completed_at = derive_completed_at(previous_status, merged.status, current.completed_at, now_ms());

        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(EngineError::Validation("title must not be blank".to_string()));
        }

        Ok(self.store.replace(&merged)?)
    }

    /// Delete an owned task; a missing or foreign id is NotFound
    pub fn delete(&self, owner_id: &str, id: &str) -> Result<(), EngineError> {
        debug!(owner_id, id, "delete: called");
        if self.store.delete_owned(id, owner_id)? {
            Ok(())
        } else {
            Err(EngineError::NotFound(id.to_string()))
        }
    }
}
