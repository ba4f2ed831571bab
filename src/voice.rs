//! Keyword-based intent classification for spoken or typed commands.
//!
//! Rules are checked in order and the first rule with a keyword contained
//! in the (lowercased) text wins. Text matching no rule is a status request.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceIntent {
    CreateTask,
    UpdateCase,
    ScheduleMeeting,
    SendMessage,
    GetStatus,
    Emergency,
}

impl VoiceIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::UpdateCase => "update_case",
            Self::ScheduleMeeting => "schedule_meeting",
            Self::SendMessage => "send_message",
            Self::GetStatus => "get_status",
            Self::Emergency => "emergency",
        }
    }
}

struct Rule {
    intent: VoiceIntent,
    keywords: &'static [&'static str],
}

// Checked top to bottom: create_task, update_case, schedule_meeting,
// send_message, emergency, get_status. Earlier rules win on overlap, so
// "send an emergency message" is send_message. Text matching nothing is
// get_status.
const RULES: &[Rule] = &[
    Rule {
        intent: VoiceIntent::CreateTask,
        keywords: &[
            "create task",
            "create a task",
            "add task",
            "add a task",
            "new task",
            "remind me",
            "todo",
            "to-do",
        ],
    },
    Rule {
        intent: VoiceIntent::UpdateCase,
        keywords: &[
            "update case",
            "update the case",
            "case update",
            "close case",
            "close the case",
            "reopen case",
        ],
    },
    Rule {
        intent: VoiceIntent::ScheduleMeeting,
        keywords: &["schedule", "meeting", "appointment", "calendar", "book a"],
    },
    Rule {
        intent: VoiceIntent::SendMessage,
        keywords: &[
            "send message",
            "send a message",
            "send email",
            "send an email",
            "text message",
            "email",
            "message",
        ],
    },
    Rule {
        intent: VoiceIntent::Emergency,
        keywords: &["emergency", "urgent help", "call 911", "help me"],
    },
    Rule {
        intent: VoiceIntent::GetStatus,
        keywords: &["status", "what's", "what is", "how many", "overview", "summary"],
    },
];

static TASK_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:create|add|make)\s+(?:a\s+|an\s+)?(?:new\s+)?task|\bnew\s+task|\bremind\s+me)\b[\s:,-]*(?:(?:to|called|named|for)\s+)?(.+)$",
    )
    .unwrap()
});

/// Classify `text` into an intent
pub fn classify(text: &str) -> VoiceIntent {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map_or(VoiceIntent::GetStatus, |rule| rule.intent)
}

/// A classified command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceCommand {
    pub intent: VoiceIntent,
    pub text: String,
    /// For `create_task`: the task title, when one follows the trigger phrase
    pub subject: Option<String>,
}

pub fn parse_command(text: &str) -> VoiceCommand {
    let text = text.trim();
    let intent = classify(text);
    let subject = match intent {
        VoiceIntent::CreateTask => task_subject(text),
        _ => None,
    };

    VoiceCommand {
        intent,
        text: text.to_string(),
        subject,
    }
}

fn task_subject(text: &str) -> Option<String> {
    let captured = TASK_SUBJECT.captures(text)?.get(1)?.as_str();
    let subject = captured.trim().trim_end_matches(['.', '!', '?']).trim();
    if subject.is_empty() {
        None
    } else {
        Some(subject.to_string())
    }
}
