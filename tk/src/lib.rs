//! TaskKeeper - personal task manager
//!
//! Lifecycle and query layer over the owner-scoped [`taskstore`]:
//! creation defaults, field-level update merges, derived completion
//! timestamps, and conversion of missing records into typed errors.
//!
//! # Example
//!
//! ```ignore
//! use taskkeeper::{TaskDraft, TaskEngine, TaskPatch};
//! use taskstore::{TaskStatus, TaskStore};
//!
//! let engine = TaskEngine::new(TaskStore::open("tasks.db")?);
//! let task = engine.create("user-1", TaskDraft { title: "Buy milk".into(), ..Default::default() })?;
//! engine.update("user-1", &task.id, TaskPatch { status: Some(TaskStatus::Completed), ..Default::default() })?;
//! ```

pub mod cli;
pub mod config;
mod engine;
pub mod identity;

pub use config::Config;
pub use engine::{EngineError, TaskDraft, TaskEngine, TaskPatch};
