use anyhow::Result;
use clap::{ArgAction, Subcommand};

use super::display::{format_datetime, print_heading};
use super::AppStore;
use crate::config::Config;
use crate::models::SettingsUpdate;
use crate::store::Summary;

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show AI settings and where data is stored
    Show,
    /// Change AI settings
    Set {
        #[arg(long, action = ArgAction::Set)]
        enabled: Option<bool>,
        #[arg(long, action = ArgAction::Set)]
        auto_enhance: Option<bool>,
        /// Minimum confidence (0 to 1) for an insight to be actionable
        #[arg(long)]
        threshold: Option<f64>,
    },
}

pub fn run_settings(store: &mut AppStore, config: &Config, cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show => {
            let settings = store.settings();
            print_heading("SETTINGS");
            println!("  Database:     {}", config.db_path.display());
            println!("  AI enabled:   {}", yes_no(settings.enabled));
            println!("  Auto-enhance: {}", yes_no(settings.auto_enhance));
            println!("  Threshold:    {:.2}", settings.confidence_threshold);
            if let Some(ref last) = settings.last_analysis {
                println!("  Last run:     {}", format_datetime(last));
            }
            println!(
                "  AI provider:  {}",
                if config.ai_available() {
                    "configured"
                } else {
                    "not configured (set OPENAI_API_KEY)"
                }
            );
        }
        SettingsCommand::Set {
            enabled,
            auto_enhance,
            threshold,
        } => {
            if enabled.is_none() && auto_enhance.is_none() && threshold.is_none() {
                println!("Nothing to change.");
                return Ok(());
            }
            let settings = store.update_settings(SettingsUpdate {
                enabled,
                auto_enhance,
                confidence_threshold: threshold,
                ..Default::default()
            })?;
            println!(
                "AI {}, auto-enhance {}, threshold {:.2}",
                if settings.enabled { "on" } else { "off" },
                if settings.auto_enhance { "on" } else { "off" },
                settings.confidence_threshold
            );
        }
    }
    Ok(())
}

pub fn run_status(store: &AppStore) {
    print_summary(&store.summary());
}

pub fn print_summary(summary: &Summary) {
    print_heading("STATUS");
    println!("  Open tasks:     {}", summary.open_tasks());
    for (status, n) in &summary.tasks_by_status {
        println!("    {:<12} {}", status.as_str(), n);
    }
    if summary.overdue_tasks > 0 {
        println!("  Overdue:        {}", summary.overdue_tasks);
    }
    println!("  Active cases:   {}", summary.active_cases);
    println!("  Contacts:       {}", summary.contacts);
    println!("  Open insights:  {}", summary.open_insights);
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::Store;
    use std::path::PathBuf;

    #[test]
    fn test_set_threshold_is_clamped() {
        let mut store = Store::open(Database::open_memory().unwrap()).unwrap();
        let config = Config {
            db_path: PathBuf::from(":memory:"),
            log_filter: "warn".to_string(),
            ai_api_key: None,
        };
        run_settings(
            &mut store,
            &config,
            SettingsCommand::Set {
                enabled: Some(false),
                auto_enhance: None,
                threshold: Some(4.0),
            },
        )
        .unwrap();

        assert!(!store.settings().enabled);
        assert_eq!(store.settings().confidence_threshold, 1.0);
    }
}
