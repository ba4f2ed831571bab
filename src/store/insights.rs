use chrono::{DateTime, Utc};
use tracing::info;

use super::Store;
use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{EntityType, Insight, NewInsight, INSIGHT_RETENTION_DAYS};

impl<K: KeyValueStore> Store<K> {
    /// Store a new insight with a fresh id and creation time. The id is also
    /// recorded on the owning task or case.
    pub fn add_insight(&mut self, new: NewInsight) -> Result<Insight> {
        let mut insight = new.into_insight();
        insight.id = self.fresh_id(insight.id);

        match insight.entity_type {
            EntityType::Task => {
                if let Some(task) = self.data.tasks.iter_mut().find(|t| t.id == insight.entity_id) {
                    task.ai_insights.push(insight.id.clone());
                }
            }
            EntityType::Case => {
                if let Some(case) = self.data.cases.iter_mut().find(|c| c.id == insight.entity_id) {
                    case.ai_insights.push(insight.id.clone());
                }
            }
            EntityType::Contact => {}
        }

        self.data.ai_insights.push(insight.clone());
        self.save()?;
        Ok(insight)
    }

    pub fn get_insight(&self, id: &str) -> Option<&Insight> {
        self.data.ai_insights.iter().find(|i| i.id == id)
    }

    /// Non-dismissed insights for one entity. Matching is on id AND type.
    pub fn insights_for_entity(&self, entity_id: &str, entity_type: EntityType) -> Vec<&Insight> {
        self.data
            .ai_insights
            .iter()
            .filter(|i| !i.dismissed && i.belongs_to(entity_id, entity_type))
            .collect()
    }

    /// Open insights confident enough to act on. Empty while AI is disabled.
    pub fn actionable_insights(&self) -> Vec<&Insight> {
        let settings = &self.data.ai_settings;
        if !settings.enabled {
            return Vec::new();
        }
        self.data
            .ai_insights
            .iter()
            .filter(|i| i.is_open() && i.confidence >= settings.confidence_threshold)
            .collect()
    }

    /// Hide an insight from queries. The record stays until it expires.
    pub fn dismiss_insight(&mut self, id: &str) -> Result<bool> {
        let Some(insight) = self.data.ai_insights.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        insight.dismissed = true;
        self.save()?;
        Ok(true)
    }

    /// Mark an insight applied, exempting it from expiry. Applying twice
    /// keeps the first timestamp.
    pub fn apply_insight(&mut self, id: &str) -> Result<bool> {
        let Some(insight) = self.data.ai_insights.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        if insight.applied_at.is_none() {
            insight.applied_at = Some(Utc::now());
        }
        self.save()?;
        Ok(true)
    }

    /// Remove unapplied insights older than the retention window
    pub fn cleanup_old_insights(&mut self) -> Result<usize> {
        self.cleanup_old_insights_at(Utc::now())
    }

    pub fn cleanup_old_insights_at(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let expired: Vec<String> = self
            .data
            .ai_insights
            .iter()
            .filter(|i| i.is_expired(now))
            .map(|i| i.id.clone())
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        self.data.ai_insights.retain(|i| !i.is_expired(now));
        self.detach_insight_ids(&expired);
        info!(
            removed = expired.len(),
            retention_days = INSIGHT_RETENTION_DAYS,
            "cleaned up expired insights"
        );
        self.save()?;
        Ok(expired.len())
    }

    /// Drop every insight owned by the entity, without saving
    pub(super) fn remove_insights_for(&mut self, entity_id: &str, entity_type: EntityType) -> usize {
        let removed: Vec<String> = self
            .data
            .ai_insights
            .iter()
            .filter(|i| i.belongs_to(entity_id, entity_type))
            .map(|i| i.id.clone())
            .collect();

        self.data
            .ai_insights
            .retain(|i| !i.belongs_to(entity_id, entity_type));
        self.detach_insight_ids(&removed);
        removed.len()
    }

    fn detach_insight_ids(&mut self, ids: &[String]) {
        for task in &mut self.data.tasks {
            task.ai_insights.retain(|id| !ids.contains(id));
        }
        for case in &mut self.data.cases {
            case.ai_insights.retain(|id| !ids.contains(id));
        }
    }
}
