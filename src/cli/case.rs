use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use super::display::{case_row, print_case, print_heading};
use super::ui::confirm_delete;
use super::AppStore;
use crate::models::{CaseStatus, CaseUpdate, EntityType, NewCase};

const STATUSES: [&str; 3] = ["active", "closed", "on_hold"];

#[derive(Subcommand)]
pub enum CaseCommand {
    /// Open a case
    Add(CaseAddArgs),
    /// List cases
    List {
        #[arg(short, long, value_parser = STATUSES)]
        status: Option<String>,
    },
    /// Show a case with its tasks and insights
    Show { id: String },
    /// Change fields of a case
    Update(CaseUpdateArgs),
    /// Delete a case, unlinking it from tasks and contacts
    Delete {
        id: String,
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct CaseAddArgs {
    pub title: String,
    #[arg(short, long)]
    pub client: String,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Practice area, e.g. litigation
    #[arg(short = 't', long = "type")]
    pub case_type: Option<String>,
    #[arg(short, long, value_parser = STATUSES)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct CaseUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub client: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short = 't', long = "type")]
    pub case_type: Option<String>,
    #[arg(short, long, value_parser = STATUSES)]
    pub status: Option<String>,
}

pub fn run_case(store: &mut AppStore, cmd: CaseCommand) -> Result<()> {
    match cmd {
        CaseCommand::Add(args) => {
            let case = store.add_case(NewCase {
                title: args.title,
                client_name: args.client,
                description: args.description,
                case_type: args.case_type,
                status: args.status.as_deref().map(CaseStatus::parse),
            })?;
            println!("Opened case {}", case.id);
        }
        CaseCommand::List { status } => {
            let cases = store.list_cases(status.as_deref().map(CaseStatus::parse));
            if cases.is_empty() {
                println!("No cases.");
                return Ok(());
            }
            print_heading(&format!("CASES ({})", cases.len()));
            for case in cases {
                println!("{}", case_row(case));
            }
        }
        CaseCommand::Show { id } => {
            let case = store
                .get_case(&id)
                .ok_or_else(|| anyhow!("No case with id {}", id))?;
            let tasks = store.tasks_for_case(&id);
            let insights = store.insights_for_entity(&id, EntityType::Case);
            print_case(case, &tasks, &insights);
        }
        CaseCommand::Update(args) => {
            let update = CaseUpdate {
                title: args.title,
                description: args.description.map(Some),
                case_type: args.case_type,
                client_name: args.client,
                status: args.status.as_deref().map(CaseStatus::parse),
                ..Default::default()
            };
            match store.update_case(&args.id, update)? {
                Some(case) => println!("Updated case {}", case.id),
                None => return Err(anyhow!("No case with id {}", args.id)),
            }
        }
        CaseCommand::Delete { id, force } => {
            let (title, linked) = match store.get_case(&id) {
                Some(case) => (case.title.clone(), store.tasks_for_case(&id).len()),
                None => return Err(anyhow!("No case with id {}", id)),
            };
            let what = if linked > 0 {
                format!("case \"{}\" (unlinks {} task(s))", title, linked)
            } else {
                format!("case \"{}\"", title)
            };
            if !confirm_delete(&what, force)? {
                println!("Cancelled.");
                return Ok(());
            }
            store.delete_case(&id)?;
            println!("Deleted.");
        }
    }
    Ok(())
}
