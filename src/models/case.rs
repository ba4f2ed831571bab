use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generate_id;

pub const DEFAULT_CASE_TYPE: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Active,
    Closed,
    OnHold,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::OnHold => "on_hold",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "closed" => Self::Closed,
            "on_hold" => Self::OnHold,
            _ => Self::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// AI analysis of a case. Also the payload of a `case_analysis` insight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseAnalysis {
    pub complexity: Complexity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_probability: Option<f64>,
    pub risk_factors: Vec<String>,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free text, e.g. "litigation", "estate planning"
    pub case_type: String,
    pub client_name: String,
    #[serde(default)]
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<CaseAnalysis>,
    #[serde(default)]
    pub ai_insights: Vec<String>,
}

impl Case {
    pub fn new(title: String, client_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title,
            description: None,
            case_type: DEFAULT_CASE_TYPE.to_string(),
            client_name,
            status: CaseStatus::default(),
            created_at: now,
            updated_at: now,
            ai_analysis: None,
            ai_insights: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CaseStatus::Active
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCase {
    pub title: String,
    pub client_name: String,
    pub description: Option<String>,
    pub case_type: Option<String>,
    pub status: Option<CaseStatus>,
}

impl NewCase {
    pub fn into_case(self) -> Case {
        let mut case = Case::new(self.title, self.client_name);
        case.description = self.description;
        if let Some(case_type) = self.case_type {
            case.case_type = case_type;
        }
        case.status = self.status.unwrap_or_default();
        case
    }
}

/// Partial update for a case; see [`super::TaskUpdate`] for the
/// `Option<Option<_>>` convention.
#[derive(Debug, Clone, Default)]
pub struct CaseUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub case_type: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<CaseStatus>,
    pub ai_analysis: Option<Option<CaseAnalysis>>,
}

impl CaseUpdate {
    pub fn apply(self, case: &mut Case) {
        if let Some(title) = self.title {
            case.title = title;
        }
        if let Some(description) = self.description {
            case.description = description;
        }
        if let Some(case_type) = self.case_type {
            case.case_type = case_type;
        }
        if let Some(client_name) = self.client_name {
            case.client_name = client_name;
        }
        if let Some(status) = self.status {
            case.status = status;
        }
        if let Some(analysis) = self.ai_analysis {
            case.ai_analysis = analysis;
        }
        case.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_new() {
        let case = Case::new("Smith v. Jones".to_string(), "Ann Smith".to_string());
        assert_eq!(case.status, CaseStatus::Active);
        assert_eq!(case.case_type, DEFAULT_CASE_TYPE);
        assert!(case.is_active());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(CaseStatus::parse("on_hold"), CaseStatus::OnHold);
        assert_eq!(CaseStatus::parse("on-hold"), CaseStatus::OnHold);
        assert_eq!(CaseStatus::parse("CLOSED"), CaseStatus::Closed);
        assert_eq!(CaseStatus::parse(""), CaseStatus::Active);
    }

    #[test]
    fn test_new_case_overrides() {
        let case = NewCase {
            title: "Estate of Doe".to_string(),
            client_name: "J. Doe".to_string(),
            case_type: Some("probate".to_string()),
            status: Some(CaseStatus::OnHold),
            ..Default::default()
        }
        .into_case();
        assert_eq!(case.case_type, "probate");
        assert_eq!(case.status, CaseStatus::OnHold);
    }

    #[test]
    fn test_analysis_defaults_on_deserialize() {
        let analysis: CaseAnalysis = serde_json::from_str(r#"{"complexity":"high"}"#).unwrap();
        assert_eq!(analysis.complexity, Complexity::High);
        assert!(analysis.risk_factors.is_empty());
        assert_eq!(analysis.success_probability, None);
    }
}
