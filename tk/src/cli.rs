//! CLI argument parsing for taskkeeper

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tk")]
#[command(author, version, about = "Personal task manager", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Act as this owner (defaults to config `owner`, then $USER)
    #[arg(short, long)]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task title
        #[arg(required = true)]
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: low, medium or high (default: medium)
        #[arg(short, long)]
        priority: Option<String>,

        /// Deadline, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, newest first
    List {
        /// Only tasks whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Update fields of a task
    Update {
        /// Task ID
        #[arg(required = true)]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,

        /// New status: pending, in-progress or completed
        #[arg(short, long)]
        status: Option<String>,

        /// New deadline, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Remove the deadline
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Mark a task completed
    Done {
        /// Task ID
        #[arg(required = true)]
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        #[arg(required = true)]
        id: String,
    },
}

/// Parse a deadline given as RFC 3339 or a bare date (midnight UTC)
/// into Unix milliseconds.
pub fn parse_due_date(input: &str) -> Result<i64, String> {
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.timestamp_millis());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
    }
    Err(format!("Invalid due date (want RFC 3339 or YYYY-MM-DD): {}", input))
}
