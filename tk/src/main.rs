use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;

use taskkeeper::cli::{Cli, Command, parse_due_date};
use taskkeeper::config::Config;
use taskkeeper::{TaskDraft, TaskEngine, TaskPatch, identity};
use taskstore::{Priority, Task, TaskStatus, TaskStore, now_ms};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn format_ms(ms: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn status_colored(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Pending => "pending".yellow(),
        TaskStatus::InProgress => "in-progress".blue(),
        TaskStatus::Completed => "completed".green(),
    }
}

fn print_task(task: &Task) {
    let now = now_ms();
    print!(
        "{}  {:<11}  {:<6}  {}",
        task.id.dimmed(),
        status_colored(task.status),
        task.priority.to_string(),
        task.title
    );
    if let Some(due) = task.due_date {
        let rendered = format!(" due {}", format_ms(due));
        if task.is_overdue(now) {
            print!("{}", rendered.red());
        } else {
            print!("{}", rendered);
        }
    }
    if let Some(completed_at) = task.completed_at {
        print!("{}", format!(" done {}", format_ms(completed_at)).dimmed());
    }
    println!();
}

fn parse_priority(input: &str) -> Result<Priority> {
    input.parse().map_err(|e: String| eyre!(e))
}

fn parse_status(input: &str) -> Result<TaskStatus> {
    input.parse().map_err(|e: String| eyre!(e))
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let owner = identity::resolve_owner(cli.owner.clone(), &config)?;

    info!("taskkeeper starting as owner {}", owner);

    let store = TaskStore::open(&config.db_path).context("Failed to open task store")?;
    let engine = TaskEngine::new(store);

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            due,
        } => {
            let draft = TaskDraft {
                title,
                description,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                due_date: due.as_deref().map(parse_due_date).transpose().map_err(|e| eyre!(e))?,
            };
            let task = engine.create(&owner, draft)?;
            println!("{} Added task: {}", "✓".green(), task.id.cyan());
        }
        Command::List { search } => {
            let tasks = engine.list(&owner, search.as_deref())?;
            if tasks.is_empty() {
                println!("No tasks found");
            } else {
                for task in &tasks {
                    print_task(task);
                }
            }
        }
        Command::Update {
            id,
            title,
            description,
            priority,
            status,
            due,
            clear_due,
        } => {
            let due_date = if clear_due {
                Some(None)
            } else {
                due.as_deref()
                    .map(parse_due_date)
                    .transpose()
                    .map_err(|e| eyre!(e))?
                    .map(Some)
            };
            let patch = TaskPatch {
                title,
                description,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                due_date,
            };
            let task = engine.update(&owner, &id, patch)?;
            println!("{} Updated task: {}", "✓".green(), task.id.cyan());
            print_task(&task);
        }
        Command::Done { id } => {
            let patch = TaskPatch {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            };
            let task = engine.update(&owner, &id, patch)?;
            println!("{} Completed task: {}", "✓".green(), task.id.cyan());
            print_task(&task);
        }
        Command::Delete { id } => {
            engine.delete(&owner, &id)?;
            println!("{} Deleted task: {}", "✓".green(), id);
        }
    }

    Ok(())
}
