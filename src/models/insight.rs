//! Advisory records attached to tasks, cases and contacts.
//!
//! An insight has its own lifecycle, independent of the entity it annotates:
//! it can be dismissed (hidden but kept), applied (kept forever) or left
//! alone, in which case it expires after [`INSIGHT_RETENTION_DAYS`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{generate_id, CaseAnalysis, TaskSuggestions};

pub const INSIGHT_RETENTION_DAYS: i64 = 30;

/// Kind of entity an insight belongs to. Part of the lookup key so that ids
/// from different entity kinds never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Task,
    Case,
    Contact,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Case => "case",
            Self::Contact => "contact",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "case" => Ok(Self::Case),
            "contact" => Ok(Self::Contact),
            _ => Err(format!("unknown entity type: {}", s)),
        }
    }
}

/// Insight body, discriminated by `type`.
///
/// A body that fits none of the known shapes is kept verbatim as
/// `Unrecognized` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsightPayload {
    TaskEnhancement(TaskSuggestions),
    CaseAnalysis(CaseAnalysis),
    CrossConnection {
        related_entity_id: String,
        related_entity_type: EntityType,
        relationship: String,
    },
    WorkflowSuggestion {
        title: String,
        #[serde(default)]
        steps: Vec<String>,
    },
    #[serde(untagged)]
    Unrecognized(Value),
}

impl InsightPayload {
    pub fn kind(&self) -> &str {
        match self {
            Self::TaskEnhancement(_) => "task_enhancement",
            Self::CaseAnalysis(_) => "case_analysis",
            Self::CrossConnection { .. } => "cross_connection",
            Self::WorkflowSuggestion { .. } => "workflow_suggestion",
            Self::Unrecognized(raw) => raw.get("type").and_then(Value::as_str).unwrap_or("unknown"),
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match self {
            Self::TaskEnhancement(s) => {
                let mut parts = Vec::new();
                if let Some(p) = s.suggested_priority {
                    parts.push(format!("priority {}", p.as_str()));
                }
                if !s.suggested_tags.is_empty() {
                    parts.push(format!("tags {}", s.suggested_tags.join(", ")));
                }
                if let Some(first) = s.next_steps.first() {
                    parts.push(format!("next: {}", first));
                }
                if let Some(minutes) = s.estimated_minutes {
                    parts.push(format!("~{} min", minutes));
                }
                if parts.is_empty() {
                    "No changes suggested".to_string()
                } else {
                    parts.join("; ")
                }
            }
            Self::CaseAnalysis(a) => {
                let mut line = format!("{} complexity", a.complexity.as_str());
                if let Some(p) = a.success_probability {
                    line.push_str(&format!(", {:.0}% success", p * 100.0));
                }
                if !a.risk_factors.is_empty() {
                    line.push_str(&format!(", {} risk factor(s)", a.risk_factors.len()));
                }
                line
            }
            Self::CrossConnection {
                related_entity_id,
                related_entity_type,
                relationship,
            } => format!("{} {} {}", relationship, related_entity_type, related_entity_id),
            Self::WorkflowSuggestion { title, steps } => {
                format!("{} ({} step(s))", title, steps.len())
            }
            Self::Unrecognized(_) => "Unrecognized insight".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub entity_id: String,
    pub entity_type: EntityType,
    pub payload: InsightPayload,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dismissed: bool,
}

impl Insight {
    pub fn belongs_to(&self, entity_id: &str, entity_type: EntityType) -> bool {
        self.entity_type == entity_type && self.entity_id == entity_id
    }

    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }

    /// Neither dismissed nor applied
    pub fn is_open(&self) -> bool {
        !self.dismissed && !self.is_applied()
    }

    /// Unapplied insights expire once older than the retention window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_applied() && now - self.created_at > Duration::days(INSIGHT_RETENTION_DAYS)
    }
}

/// An insight before it is stored: no id and no creation time yet.
#[derive(Debug, Clone)]
pub struct NewInsight {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub payload: InsightPayload,
    pub confidence: f64,
}

impl NewInsight {
    pub fn into_insight(self) -> Insight {
        Insight {
            id: generate_id(),
            entity_id: self.entity_id,
            entity_type: self.entity_type,
            payload: self.payload,
            confidence: self.confidence.clamp(0.0, 1.0),
            created_at: Utc::now(),
            applied_at: None,
            dismissed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn workflow(entity_id: &str) -> Insight {
        NewInsight {
            entity_id: entity_id.to_string(),
            entity_type: EntityType::Task,
            payload: InsightPayload::WorkflowSuggestion {
                title: "Batch filings".to_string(),
                steps: vec!["Collect".to_string(), "File".to_string()],
            },
            confidence: 0.8,
        }
        .into_insight()
    }

    #[test]
    fn test_payload_tagged_by_type() {
        let insight = workflow("t1");
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["payload"]["type"], "workflow_suggestion");
        assert_eq!(json["entityType"], "task");
        assert_eq!(json["entityId"], "t1");
        assert!(json.get("appliedAt").is_none());
    }

    #[test]
    fn test_newtype_payload_parses() {
        let payload: InsightPayload = serde_json::from_str(
            r#"{"type":"task_enhancement","suggested_priority":"P1","next_steps":["call client"]}"#,
        )
        .unwrap();
        match payload {
            InsightPayload::TaskEnhancement(s) => {
                assert_eq!(s.suggested_priority, Some(Priority::P1));
                assert_eq!(s.next_steps, vec!["call client".to_string()]);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_unknown_payload_kept_verbatim() {
        let raw = r#"{"type":"horoscope","sign":"leo"}"#;
        let payload: InsightPayload = serde_json::from_str(raw).unwrap();
        assert!(matches!(payload, InsightPayload::Unrecognized(_)));
        assert_eq!(payload.kind(), "horoscope");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::from_str::<Value>(raw).unwrap()
        );
    }

    #[test]
    fn test_known_type_with_foreign_fields_kept() {
        let payload: InsightPayload =
            serde_json::from_str(r#"{"type":"cross_connection","connectedTo":"c1"}"#).unwrap();
        assert!(matches!(payload, InsightPayload::Unrecognized(_)));
        assert_eq!(payload.kind(), "cross_connection");
    }

    #[test]
    fn test_expiry() {
        let mut insight = workflow("t1");
        let now = Utc::now();
        insight.created_at = now - Duration::days(31);
        assert!(insight.is_expired(now));

        insight.applied_at = Some(now);
        assert!(!insight.is_expired(now));

        insight.applied_at = None;
        insight.created_at = now - Duration::days(29);
        assert!(!insight.is_expired(now));
    }

    #[test]
    fn test_confidence_clamped() {
        let insight = NewInsight {
            entity_id: "c1".to_string(),
            entity_type: EntityType::Case,
            payload: InsightPayload::CaseAnalysis(CaseAnalysis::default()),
            confidence: 1.7,
        }
        .into_insight();
        assert_eq!(insight.confidence, 1.0);
    }

    #[test]
    fn test_belongs_to_matches_type() {
        let insight = workflow("same-id");
        assert!(insight.belongs_to("same-id", EntityType::Task));
        assert!(!insight.belongs_to("same-id", EntityType::Case));
    }

    #[test]
    fn test_summary() {
        assert_eq!(workflow("t").payload.summary(), "Batch filings (2 step(s))");
        let analysis = InsightPayload::CaseAnalysis(CaseAnalysis {
            success_probability: Some(0.65),
            risk_factors: vec!["statute of limitations".to_string()],
            ..Default::default()
        });
        assert_eq!(analysis.summary(), "medium complexity, 65% success, 1 risk factor(s)");
    }
}
