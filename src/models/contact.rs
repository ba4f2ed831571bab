use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generate_id;

/// Role a contact plays in the practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Client,
    OpposingCounsel,
    ExpertWitness,
    CourtPersonnel,
    #[default]
    Other,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::OpposingCounsel => "opposing_counsel",
            Self::ExpertWitness => "expert_witness",
            Self::CourtPersonnel => "court_personnel",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "client" => Self::Client,
            "opposing_counsel" => Self::OpposingCounsel,
            "expert_witness" => Self::ExpertWitness,
            "court_personnel" => Self::CourtPersonnel,
            _ => Self::Other,
        }
    }
}

/// How a contact connects to the rest of the practice
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Connections {
    pub case_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contacted: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "type", default)]
    pub contact_type: ContactType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Connections>,
}

impl Contact {
    pub fn new(first_name: String, last_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            first_name,
            last_name,
            email: None,
            phone: None,
            contact_type: ContactType::default(),
            created_at: now,
            updated_at: now,
            connections: None,
        }
    }

    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => "(unnamed)".to_string(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Drop a case from the connection metadata, if present.
    pub fn unlink_case(&mut self, case_id: &str) -> bool {
        let Some(connections) = self.connections.as_mut() else {
            return false;
        };
        let before = connections.case_ids.len();
        connections.case_ids.retain(|id| id != case_id);
        let changed = connections.case_ids.len() != before;
        if changed {
            self.touch();
        }
        changed
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_type: Option<ContactType>,
    pub connections: Option<Connections>,
}

impl NewContact {
    pub fn into_contact(self) -> Contact {
        let mut contact = Contact::new(self.first_name, self.last_name);
        contact.email = self.email;
        contact.phone = self.phone;
        contact.contact_type = self.contact_type.unwrap_or_default();
        contact.connections = self.connections;
        contact
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub contact_type: Option<ContactType>,
    pub connections: Option<Option<Connections>>,
}

impl ContactUpdate {
    pub fn apply(self, contact: &mut Contact) {
        if let Some(first_name) = self.first_name {
            contact.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            contact.last_name = last_name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(contact_type) = self.contact_type {
            contact.contact_type = contact_type;
        }
        if let Some(connections) = self.connections {
            contact.connections = connections;
        }
        contact.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let mut c = Contact::new("Ada".to_string(), "Lovelace".to_string());
        assert_eq!(c.display_name(), "Ada Lovelace");
        c.last_name.clear();
        assert_eq!(c.display_name(), "Ada");
        c.first_name.clear();
        assert_eq!(c.display_name(), "(unnamed)");
    }

    #[test]
    fn test_type_serializes_as_type() {
        let mut c = Contact::new("A".to_string(), "B".to_string());
        c.contact_type = ContactType::OpposingCounsel;
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "opposing_counsel");
    }

    #[test]
    fn test_type_parse() {
        assert_eq!(ContactType::parse("expert-witness"), ContactType::ExpertWitness);
        assert_eq!(ContactType::parse("Client"), ContactType::Client);
        assert_eq!(ContactType::parse("judge"), ContactType::Other);
    }

    #[test]
    fn test_unlink_case() {
        let mut c = Contact::new("A".to_string(), "B".to_string());
        assert!(!c.unlink_case("x"));
        c.connections = Some(Connections {
            case_ids: vec!["x".to_string()],
            ..Default::default()
        });
        assert!(c.unlink_case("x"));
        assert!(c.connections.unwrap().case_ids.is_empty());
    }
}
