use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};

use super::display::{insight_row, print_heading};
use super::AppStore;
use crate::models::{EntityType, Insight, InsightPayload, NewInsight};

#[derive(Subcommand)]
pub enum InsightCommand {
    /// List insights
    List(InsightListArgs),
    /// Record an insight by hand
    Add(InsightAddArgs),
    /// Hide an insight
    Dismiss { id: String },
    /// Mark an insight as applied; applied insights never expire
    Apply { id: String },
    /// Remove unapplied insights past the retention window
    Cleanup,
}

#[derive(Args)]
pub struct InsightListArgs {
    /// Only insights for this entity (requires --kind)
    #[arg(long, requires = "kind")]
    pub entity: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(EntityType))]
    pub kind: Option<EntityType>,
    /// Only open insights at or above the confidence threshold
    #[arg(long, conflicts_with = "all")]
    pub actionable: bool,
    /// Include dismissed and applied insights
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct InsightAddArgs {
    /// Id of the task, case or contact the insight is about
    #[arg(long)]
    pub entity: String,
    #[arg(long, value_parser = clap::value_parser!(EntityType))]
    pub kind: EntityType,
    /// Workflow suggestion title
    #[arg(long, required_unless_present = "related")]
    pub title: Option<String>,
    /// Workflow step (repeatable)
    #[arg(long = "step")]
    pub steps: Vec<String>,
    /// Related entity id, for a cross-connection insight
    #[arg(long, conflicts_with = "title", requires = "related_kind", requires = "relationship")]
    pub related: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(EntityType))]
    pub related_kind: Option<EntityType>,
    #[arg(long)]
    pub relationship: Option<String>,
    #[arg(long, default_value_t = 1.0)]
    pub confidence: f64,
}

impl InsightAddArgs {
    fn payload(self) -> Result<(String, EntityType, InsightPayload, f64)> {
        let payload = match (self.title, self.related) {
            (Some(title), None) => InsightPayload::WorkflowSuggestion {
                title,
                steps: self.steps,
            },
            (None, Some(related_entity_id)) => InsightPayload::CrossConnection {
                related_entity_id,
                related_entity_type: self
                    .related_kind
                    .ok_or_else(|| anyhow!("--related-kind is required with --related"))?,
                relationship: self
                    .relationship
                    .ok_or_else(|| anyhow!("--relationship is required with --related"))?,
            },
            _ => bail!("give either --title or --related"),
        };
        Ok((self.entity, self.kind, payload, self.confidence))
    }
}

pub fn run_insight(store: &mut AppStore, cmd: InsightCommand) -> Result<()> {
    match cmd {
        InsightCommand::List(args) => {
            let insights: Vec<&Insight> = if args.actionable {
                store.actionable_insights()
            } else if let (Some(entity), Some(kind)) = (args.entity.as_deref(), args.kind) {
                store.insights_for_entity(entity, kind)
            } else {
                store
                    .data()
                    .ai_insights
                    .iter()
                    .filter(|i| args.all || i.is_open())
                    .filter(|i| args.kind.map_or(true, |k| i.entity_type == k))
                    .collect()
            };

            if insights.is_empty() {
                if args.actionable && !store.settings().enabled {
                    println!("AI insights are disabled. Enable with: lifeos settings set --enabled true");
                } else {
                    println!("No insights.");
                }
                return Ok(());
            }
            print_heading(&format!("INSIGHTS ({})", insights.len()));
            for insight in insights {
                println!("{}", insight_row(insight));
            }
        }
        InsightCommand::Add(args) => {
            if !(0.0..=1.0).contains(&args.confidence) {
                bail!("confidence must be between 0 and 1");
            }
            let (entity_id, entity_type, payload, confidence) = args.payload()?;
            let insight = store.add_insight(NewInsight {
                entity_id,
                entity_type,
                payload,
                confidence,
            })?;
            println!("Recorded insight {}", insight.id);
        }
        InsightCommand::Dismiss { id } => {
            if !store.dismiss_insight(&id)? {
                bail!("No insight with id {}", id);
            }
            println!("Dismissed.");
        }
        InsightCommand::Apply { id } => {
            if !store.apply_insight(&id)? {
                bail!("No insight with id {}", id);
            }
            println!("Applied.");
        }
        InsightCommand::Cleanup => {
            let removed = store.cleanup_old_insights()?;
            println!("Removed {} expired insight(s).", removed);
        }
    }
    Ok(())
}
