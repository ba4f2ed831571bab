use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// AI feature switches persisted alongside the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub enabled: bool,
    pub auto_enhance: bool,
    /// Insights below this confidence are not surfaced as actionable
    pub confidence_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_analysis: Option<DateTime<Utc>>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_enhance: false,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            last_analysis: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    pub auto_enhance: Option<bool>,
    pub confidence_threshold: Option<f64>,
    pub last_analysis: Option<Option<DateTime<Utc>>>,
}

impl SettingsUpdate {
    pub fn apply(self, settings: &mut AiSettings) {
        if let Some(enabled) = self.enabled {
            settings.enabled = enabled;
        }
        if let Some(auto_enhance) = self.auto_enhance {
            settings.auto_enhance = auto_enhance;
        }
        if let Some(threshold) = self.confidence_threshold {
            settings.confidence_threshold = threshold.clamp(0.0, 1.0);
        }
        if let Some(last_analysis) = self.last_analysis {
            settings.last_analysis = last_analysis;
        }
    }
}
