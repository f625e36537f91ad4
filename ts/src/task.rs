//! Task entity
//!
//! Task is the sole record type in the store. `owner_id` scopes every
//! read and write; `completed_at` is derived from status transitions by
//! the lifecycle layer and is never accepted from a client.

use serde::{Deserialize, Serialize};

use crate::priority::Priority;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not yet started
    #[default]
    Pending,
    /// Being worked on
    InProgress,
    /// Done; `completed_at` records when
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A stored task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store at insert
    pub id: String,

    /// Owning user; every operation is scoped to this field
    pub owner_id: String,

    /// Human-readable title, never blank
    pub title: String,

    /// Free-text description, empty when not provided
    pub description: String,

    /// Priority level
    pub priority: Priority,

    /// Current workflow status
    pub status: TaskStatus,

    /// Optional deadline (Unix milliseconds); None means no deadline
    pub due_date: Option<i64>,

    /// When the task last entered `Completed` (Unix milliseconds).
    /// Present iff `status == Completed`.
    pub completed_at: Option<i64>,

    /// Creation timestamp (Unix milliseconds), set by the store
    pub created_at: i64,

    /// Last mutation timestamp (Unix milliseconds), bumped by the store
    pub updated_at: i64,
}

impl Task {
    /// Check if the task is completed
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Check if the task is past its deadline and not completed
    pub fn is_overdue(&self, now: i64) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}

/// Field values for a task about to be inserted.
/// The store assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<i64>,
}

impl NewTask {
    /// Create a NewTask with defaults for everything but owner and title
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            due_date: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the deadline
    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Materialize a full Task from insert-time fields
pub(crate) fn assemble(new: NewTask, id: String, now: i64) -> Task {
    Task {
        id,
        owner_id: new.owner_id,
        title: new.title,
        description: new.description,
        priority: new.priority,
        status: new.status,
        due_date: new.due_date,
        completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::now_ms;

    fn sample() -> Task {
        assemble(NewTask::new("owner-1", "Write report"), "task-1".to_string(), now_ms())
    }

    #[test]
    fn test_status_display_roundtrip() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed] {
            let parsed: TaskStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_serde_wire_values() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in-progress\"");
        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn test_new_task_defaults() {
        let new = NewTask::new("owner-1", "Buy milk");
        assert_eq!(new.description, "");
        assert_eq!(new.priority, Priority::Medium);
        assert_eq!(new.status, TaskStatus::Pending);
        assert!(new.due_date.is_none());
    }

    #[test]
    fn test_new_task_builders() {
        let new = NewTask::new("owner-1", "Buy milk")
            .with_description("2 liters")
            .with_priority(Priority::High)
            .with_due_date(1_700_000_000_000);
        assert_eq!(new.description, "2 liters");
        assert_eq!(new.priority, Priority::High);
        assert_eq!(new.due_date, Some(1_700_000_000_000));
    }

    #[test]
    fn test_is_overdue() {
        let mut task = sample();
        assert!(!task.is_overdue(now_ms()));

        task.due_date = Some(1000);
        assert!(task.is_overdue(2000));
        assert!(!task.is_overdue(500));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(2000));
    }

    #[test]
    fn test_task_serde() {
        let task = sample();
        let json = serde_json::to_string(&task).unwrap();
        let deserialized: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task, deserialized);

        // Optional fields stay optional on the wire
        assert!(json.contains("\"due_date\":null"));
        assert!(json.contains("\"completed_at\":null"));
    }
}
