use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generate_id;

/// Task priority. `Deadline` marks tasks driven by a hard court or filing date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
    #[serde(rename = "deadline")]
    Deadline,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::Deadline => "deadline",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "p1" => Self::P1,
            "p2" => Self::P2,
            "deadline" => Self::Deadline,
            _ => Self::P3,
        }
    }
}

/// Where a task sits in the inbox → done workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Inbox,
    NextAction,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::NextAction => "next_action",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "next_action" => Self::NextAction,
            "in_progress" => Self::InProgress,
            "done" => Self::Done,
            _ => Self::Inbox,
        }
    }

    pub fn all() -> &'static [TaskStatus] {
        &[Self::Inbox, Self::NextAction, Self::InProgress, Self::Done]
    }
}

/// Structured AI suggestions for a task. Also the payload of a
/// `task_enhancement` insight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSuggestions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_priority: Option<Priority>,
    pub suggested_tags: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Linked case ids
    #[serde(default)]
    pub case_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Confidence (0..1) of the last AI enhancement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestions: Option<TaskSuggestions>,
    /// Ids of insights attached to this task
    #[serde(default)]
    pub ai_insights: Vec<String>,
}

impl Task {
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title,
            description: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            case_ids: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            due_date: None,
            ai_confidence: None,
            ai_suggestions: None,
            ai_insights: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_done() && self.due_date.map_or(false, |due| due < now)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Drop a case link. Returns true (and refreshes `updated_at`) if the
    /// task referenced the case.
    pub fn unlink_case(&mut self, case_id: &str) -> bool {
        let before = self.case_ids.len();
        self.case_ids.retain(|id| id != case_id);
        let changed = self.case_ids.len() != before;
        if changed {
            self.touch();
        }
        changed
    }
}

/// Fields supplied when creating a task. Unset fields take their defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub case_ids: Vec<String>,
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.title);
        task.description = self.description;
        task.priority = self.priority.unwrap_or_default();
        task.status = self.status.unwrap_or_default();
        task.case_ids = self.case_ids;
        task.tags = self.tags;
        task.due_date = self.due_date;
        task
    }
}

/// Partial update for a task. `None` leaves the field untouched; for
/// optional fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub case_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub ai_confidence: Option<Option<f64>>,
    pub ai_suggestions: Option<Option<TaskSuggestions>>,
}

impl TaskUpdate {
    /// Merge into `task` and refresh `updated_at`.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(case_ids) = self.case_ids {
            task.case_ids = case_ids;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(confidence) = self.ai_confidence {
            task.ai_confidence = confidence;
        }
        if let Some(suggestions) = self.ai_suggestions {
            task.ai_suggestions = suggestions;
        }
        task.touch();
    }
}
