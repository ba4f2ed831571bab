//! `lifeos task ...`

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Subcommand};

use super::display::{print_heading, print_task, task_row};
use super::ui::confirm_delete;
use super::AppStore;
use crate::models::{EntityType, NewTask, Priority, TaskStatus, TaskUpdate};

const PRIORITIES: [&str; 4] = ["P1", "P2", "P3", "deadline"];
const STATUSES: [&str; 4] = ["inbox", "next_action", "in_progress", "done"];

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add(TaskAddArgs),
    /// List tasks
    List(TaskListArgs),
    /// Show one task with its insights
    Show { id: String },
    /// Change fields of a task
    Update(TaskUpdateArgs),
    /// Mark a task done
    Done { id: String },
    /// Delete a task and its insights
    Delete {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct TaskAddArgs {
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long, value_parser = PRIORITIES)]
    pub priority: Option<String>,
    #[arg(short, long, value_parser = STATUSES)]
    pub status: Option<String>,
    /// Link to a case (repeatable)
    #[arg(long = "case", value_name = "CASE_ID")]
    pub case_ids: Vec<String>,
    /// Tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Due date, YYYY-MM-DD or RFC 3339
    #[arg(long, value_parser = parse_due)]
    pub due: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct TaskListArgs {
    #[arg(short, long, value_parser = STATUSES)]
    pub status: Option<String>,
    /// Only tasks linked to this case
    #[arg(long = "case", value_name = "CASE_ID")]
    pub case_id: Option<String>,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long, value_parser = PRIORITIES)]
    pub priority: Option<String>,
    #[arg(short, long, value_parser = STATUSES)]
    pub status: Option<String>,
    /// Replace linked cases (repeatable)
    #[arg(long = "case", value_name = "CASE_ID")]
    pub case_ids: Vec<String>,
    /// Replace tags (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

pub fn run_task(store: &mut AppStore, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add(args) => {
            let task = store.add_task(NewTask {
                title: args.title,
                description: args.description,
                priority: args.priority.as_deref().map(Priority::parse),
                status: args.status.as_deref().map(TaskStatus::parse),
                case_ids: args.case_ids,
                tags: args.tags,
                due_date: args.due,
            })?;
            println!("Created task {}", task.id);
        }
        TaskCommand::List(args) => {
            let status = args.status.as_deref().map(TaskStatus::parse);
            let tasks: Vec<_> = match args.case_id {
                Some(ref case_id) => store
                    .tasks_for_case(case_id)
                    .into_iter()
                    .filter(|t| status.map_or(true, |s| t.status == s))
                    .collect(),
                None => store.list_tasks(status),
            };

            if tasks.is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            print_heading(&format!("TASKS ({})", tasks.len()));
            for task in tasks {
                println!("{}", task_row(task));
            }
        }
        TaskCommand::Show { id } => {
            let task = store
                .get_task(&id)
                .ok_or_else(|| anyhow!("No task with id {}", id))?;
            let insights = store.insights_for_entity(&id, EntityType::Task);
            print_task(task, &insights);
        }
        TaskCommand::Update(args) => {
            let due_date = if args.clear_due {
                Some(None)
            } else {
                args.due.map(Some)
            };
            let update = TaskUpdate {
                title: args.title,
                description: args.description.map(Some),
                priority: args.priority.as_deref().map(Priority::parse),
                status: args.status.as_deref().map(TaskStatus::parse),
                case_ids: (!args.case_ids.is_empty()).then_some(args.case_ids),
                tags: (!args.tags.is_empty()).then_some(args.tags),
                due_date,
                ..Default::default()
            };
            match store.update_task(&args.id, update)? {
                Some(task) => println!("Updated task {}", task.id),
                None => return Err(anyhow!("No task with id {}", args.id)),
            }
        }
        TaskCommand::Done { id } => {
            let update = TaskUpdate {
                status: Some(TaskStatus::Done),
                ..Default::default()
            };
            match store.update_task(&id, update)? {
                Some(task) => println!("Done: {}", task.title),
                None => return Err(anyhow!("No task with id {}", id)),
            }
        }
        TaskCommand::Delete { id, force } => {
            let title = store
                .get_task(&id)
                .map(|t| t.title.clone())
                .ok_or_else(|| anyhow!("No task with id {}", id))?;
            if !confirm_delete(&format!("task \"{}\"", title), force)? {
                println!("Cancelled.");
                return Ok(());
            }
            store.delete_task(&id)?;
            println!("Deleted.");
        }
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date '{}'", s))?;
    Ok(Utc.from_utc_datetime(&midnight))
}
