use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AiSettings, Case, Contact, Insight, Task};

/// Version tag written with every save. A stored payload carrying any other
/// tag goes through version migration on load.
pub const DATA_VERSION: &str = "2.0";

/// The whole persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub version: String,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub ai_insights: Vec<Insight>,
    #[serde(default)]
    pub ai_settings: AiSettings,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            version: DATA_VERSION.to_string(),
            last_updated: None,
            tasks: Vec::new(),
            cases: Vec::new(),
            contacts: Vec::new(),
            ai_insights: Vec::new(),
            ai_settings: AiSettings::default(),
        }
    }
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.cases.is_empty()
            && self.contacts.is_empty()
            && self.ai_insights.is_empty()
    }

    /// True if any task, case, contact or insight already uses `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
            || self.cases.iter().any(|c| c.id == id)
            || self.contacts.iter().any(|c| c.id == id)
            || self.ai_insights.iter().any(|i| i.id == id)
    }
}
