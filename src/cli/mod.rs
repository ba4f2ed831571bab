use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

pub mod case;
pub mod contact;
pub mod display;
pub mod insight;
pub mod janitor;
pub mod settings;
pub mod task;
pub mod ui;
pub mod voice;

use crate::config::Config;
use crate::db::Database;
use crate::store::Store;

pub type AppStore = Store<Database>;

#[derive(Parser)]
#[command(name = "lifeos")]
#[command(about = "Tasks, cases and contacts for a legal practice")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides LIFEOS_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommand),
    /// Manage legal cases
    #[command(subcommand)]
    Case(case::CaseCommand),
    /// Manage contacts
    #[command(subcommand)]
    Contact(contact::ContactCommand),
    /// Review, dismiss and apply insights
    #[command(subcommand)]
    Insight(insight::InsightCommand),
    /// Show or change AI settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
    /// Overview of open work
    Status,
    /// Interpret a spoken or typed command
    Voice(VoiceArgs),
    /// Run insight cleanup on a repeating timer until interrupted
    Janitor(JanitorArgs),
}

#[derive(Args)]
pub struct VoiceArgs {
    /// The command text, e.g. "add task review contract"
    #[arg(required = true, trailing_var_arg = true)]
    pub words: Vec<String>,
}

#[derive(Args)]
pub struct JanitorArgs {
    /// Hours between cleanup runs
    #[arg(long, default_value_t = crate::store::DEFAULT_CLEANUP_INTERVAL_HOURS)]
    pub interval_hours: i64,
}

/// Dispatch a parsed command against an open store
pub fn run(store: &mut AppStore, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Task(cmd) => task::run_task(store, cmd),
        Commands::Case(cmd) => case::run_case(store, cmd),
        Commands::Contact(cmd) => contact::run_contact(store, cmd),
        Commands::Insight(cmd) => insight::run_insight(store, cmd),
        Commands::Settings(cmd) => settings::run_settings(store, config, cmd),
        Commands::Status => {
            settings::run_status(store);
            Ok(())
        }
        Commands::Voice(args) => voice::run_voice(store, &args.words.join(" ")),
        Commands::Janitor(args) => janitor::run_janitor(store, args.interval_hours),
    }
}
