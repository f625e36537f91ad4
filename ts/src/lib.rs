//! TaskStore - owner-scoped durable task storage
//!
//! Persists task records in SQLite and exposes the CRUD and query
//! primitives the lifecycle layer builds on. Every operation takes the
//! owner's identity and touches only that owner's records.
//!
//! # Example
//!
//! ```ignore
//! use taskstore::{NewTask, TaskStore};
//!
//! let store = TaskStore::open("tasks.db")?;
//! let task = store.insert(NewTask::new("user-1", "Buy milk"))?;
//! let mine = store.list_by_owner("user-1", Some("milk"))?;
//! ```

mod priority;
mod store;
mod task;

pub use priority::Priority;
pub use store::{StoreError, TaskStore};
pub use task::{NewTask, Task, TaskStatus};

/// Current time as Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
