//! Normalisation of older or partial records into the current shapes.
//!
//! Every field a record is missing gets its documented default rather than
//! failing the load: no `tags` becomes `[]`, no `status` becomes `inbox`, no
//! `priority` becomes `P3`, and so on. Snake-case and camel-case spellings of
//! field names are both accepted. Timestamps may be RFC 3339 strings, plain
//! dates or epoch milliseconds.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::db::KeyValueStore;
use crate::models::*;

/// Per-entity keys written by the pre-unified storage layout
pub const LEGACY_TASKS_KEY: &str = "tasks";
pub const LEGACY_CASES_KEY: &str = "cases";
pub const LEGACY_CONTACTS_KEY: &str = "contacts";

pub const UNTITLED_TASK: &str = "Untitled task";
pub const UNTITLED_CASE: &str = "Untitled case";

type Object = Map<String, Value>;

/// Outcome of a legacy import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyReport {
    pub tasks: usize,
    pub cases: usize,
    pub contacts: usize,
    /// Keys that existed but could not be read or parsed
    pub failed_keys: Vec<String>,
}

impl LegacyReport {
    pub fn imported(&self) -> usize {
        self.tasks + self.cases + self.contacts
    }
}

/// Build a dataset from the three legacy keys.
///
/// Each key is read and parsed on its own; a failure in one is logged and
/// recorded in the report without affecting the others.
pub fn migrate_legacy<K: KeyValueStore + ?Sized>(kv: &K, now: DateTime<Utc>) -> (Dataset, LegacyReport) {
    let mut data = Dataset::default();
    let mut report = LegacyReport::default();

    if let Some(value) = read_legacy_key(kv, LEGACY_TASKS_KEY, &mut report) {
        data.tasks = normalize_list(Some(&value), "task", |v| normalize_task(v, now));
        report.tasks = data.tasks.len();
    }
    if let Some(value) = read_legacy_key(kv, LEGACY_CASES_KEY, &mut report) {
        data.cases = normalize_list(Some(&value), "case", |v| normalize_case(v, now));
        report.cases = data.cases.len();
    }
    if let Some(value) = read_legacy_key(kv, LEGACY_CONTACTS_KEY, &mut report) {
        data.contacts = normalize_list(Some(&value), "contact", |v| normalize_contact(v, now));
        report.contacts = data.contacts.len();
    }

    dedupe_ids(&mut data);
    reconcile_insight_links(&mut data);
    (data, report)
}

fn read_legacy_key<K: KeyValueStore + ?Sized>(
    kv: &K,
    key: &str,
    report: &mut LegacyReport,
) -> Option<Value> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "could not read legacy key");
            report.failed_keys.push(key.to_string());
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "legacy key is not valid JSON, skipping");
            report.failed_keys.push(key.to_string());
            None
        }
    }
}

/// Upgrade a stored payload of any version to the current dataset shape.
///
/// Every record that is a JSON object is kept (re-normalised);
/// `ai_insights` and `ai_settings` are created with defaults when absent.
pub fn migrate_version(value: Value, now: DateTime<Utc>) -> Dataset {
    let Value::Object(root) = value else {
        warn!("stored data is not an object, starting empty");
        return Dataset::default();
    };

    let mut data = Dataset {
        version: DATA_VERSION.to_string(),
        last_updated: time_field(&root, &["lastUpdated", "last_updated"]),
        tasks: normalize_list(root.get("tasks"), "task", |v| normalize_task(v, now)),
        cases: normalize_list(root.get("cases"), "case", |v| normalize_case(v, now)),
        contacts: normalize_list(root.get("contacts"), "contact", |v| normalize_contact(v, now)),
        ai_insights: normalize_list(
            root.get("ai_insights").or_else(|| root.get("aiInsights")),
            "insight",
            |v| normalize_insight(v, now),
        ),
        ai_settings: root
            .get("ai_settings")
            .or_else(|| root.get("aiSettings"))
            .and_then(|v| AiSettings::deserialize(v).ok())
            .unwrap_or_default(),
    };

    dedupe_ids(&mut data);
    reconcile_insight_links(&mut data);
    data
}

fn normalize_list<T>(
    value: Option<&Value>,
    kind: &str,
    normalize: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!(kind, "expected a list of records, ignoring");
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = normalize(item);
            if record.is_none() {
                warn!(kind, index, "skipping unreadable record");
            }
            record
        })
        .collect()
}

pub fn normalize_task(value: &Value, now: DateTime<Utc>) -> Option<Task> {
    let obj = value.as_object()?;
    let created_at = time_field(obj, &["created_at", "createdAt"]).unwrap_or(now);

    let status = match str_field(obj, &["status"]) {
        Some(s) => TaskStatus::parse(&s),
        None if bool_field(obj, &["completed", "done"]) == Some(true) => TaskStatus::Done,
        None => TaskStatus::default(),
    };

    Some(Task {
        id: id_field(obj).unwrap_or_else(generate_id),
        title: str_field(obj, &["title", "name"]).unwrap_or_else(|| UNTITLED_TASK.to_string()),
        description: str_field(obj, &["description"]),
        priority: str_field(obj, &["priority"])
            .map(|s| legacy_priority(&s))
            .unwrap_or_default(),
        status,
        case_ids: string_list(obj, &["case_ids", "caseIds"]),
        tags: string_list(obj, &["tags"]),
        created_at,
        updated_at: time_field(obj, &["updated_at", "updatedAt"]).unwrap_or(created_at),
        due_date: time_field(obj, &["due_date", "dueDate"]),
        ai_confidence: f64_field(obj, &["ai_confidence", "aiConfidence"]),
        ai_suggestions: typed_field(obj, &["ai_suggestions", "aiSuggestions"]),
        ai_insights: string_list(obj, &["ai_insights", "insight_ids", "insightIds"]),
    })
}

pub fn normalize_case(value: &Value, now: DateTime<Utc>) -> Option<Case> {
    let obj = value.as_object()?;
    let created_at = time_field(obj, &["created_at", "createdAt"]).unwrap_or(now);

    Some(Case {
        id: id_field(obj).unwrap_or_else(generate_id),
        title: str_field(obj, &["title", "name"]).unwrap_or_else(|| UNTITLED_CASE.to_string()),
        description: str_field(obj, &["description"]),
        case_type: str_field(obj, &["case_type", "caseType", "type"])
            .unwrap_or_else(|| DEFAULT_CASE_TYPE.to_string()),
        client_name: str_field(obj, &["client_name", "clientName", "client"]).unwrap_or_default(),
        status: str_field(obj, &["status"])
            .map(|s| CaseStatus::parse(&s))
            .unwrap_or_default(),
        created_at,
        updated_at: time_field(obj, &["updated_at", "updatedAt"]).unwrap_or(created_at),
        ai_analysis: typed_field(obj, &["ai_analysis", "aiAnalysis"]),
        ai_insights: string_list(obj, &["ai_insights", "insight_ids", "insightIds"]),
    })
}

pub fn normalize_contact(value: &Value, now: DateTime<Utc>) -> Option<Contact> {
    let obj = value.as_object()?;
    let created_at = time_field(obj, &["created_at", "createdAt"]).unwrap_or(now);

    Some(Contact {
        id: id_field(obj).unwrap_or_else(generate_id),
        first_name: str_field(obj, &["first_name", "firstName"]).unwrap_or_default(),
        last_name: str_field(obj, &["last_name", "lastName"]).unwrap_or_default(),
        email: str_field(obj, &["email"]),
        phone: str_field(obj, &["phone"]),
        contact_type: str_field(obj, &["type", "contact_type", "contactType"])
            .map(|s| ContactType::parse(&s))
            .unwrap_or_default(),
        created_at,
        updated_at: time_field(obj, &["updated_at", "updatedAt"]).unwrap_or(created_at),
        connections: typed_field(obj, &["connections"]),
    })
}

/// Every object becomes an insight. A payload that fits no known shape is
/// kept as [`InsightPayload::Unrecognized`]; older records kept the payload
/// flat as `{type, data}`. A missing owner leaves the insight detached
/// (empty entity id) until it expires.
pub fn normalize_insight(value: &Value, now: DateTime<Utc>) -> Option<Insight> {
    let obj = value.as_object()?;
    let entity_id = str_field(obj, &["entityId", "entity_id"]).unwrap_or_default();
    let entity_type = str_field(obj, &["entityType", "entity_type"])
        .and_then(|s| s.parse().ok())
        .unwrap_or(EntityType::Task);
    if entity_id.is_empty() {
        warn!(id = ?obj.get("id"), "insight has no owner, keeping it detached");
    }

    let payload = match obj.get("payload") {
        Some(payload) => InsightPayload::deserialize(payload)
            .unwrap_or_else(|_| InsightPayload::Unrecognized(payload.clone())),
        None => {
            let mut flat = match obj.get("data").or_else(|| obj.get("content")) {
                Some(Value::Object(data)) => data.clone(),
                _ => Map::new(),
            };
            if let Some(kind) = obj.get("type") {
                flat.insert("type".to_string(), kind.clone());
            }
            let flat = Value::Object(flat);
            InsightPayload::deserialize(&flat).unwrap_or(InsightPayload::Unrecognized(flat))
        }
    };

    Some(Insight {
        id: id_field(obj).unwrap_or_else(generate_id),
        entity_id,
        entity_type,
        payload,
        confidence: f64_field(obj, &["confidence"]).unwrap_or(0.0).clamp(0.0, 1.0),
        created_at: time_field(obj, &["createdAt", "created_at"]).unwrap_or(now),
        applied_at: time_field(obj, &["appliedAt", "applied_at"]),
        dismissed: bool_field(obj, &["dismissed"]).unwrap_or(false),
    })
}

/// Older data used descriptive priorities
fn legacy_priority(s: &str) -> Priority {
    match s.to_lowercase().as_str() {
        "high" | "urgent" => Priority::P1,
        "medium" | "normal" => Priority::P2,
        _ => Priority::parse(s),
    }
}

/// Give every record a distinct id; later duplicates get fresh ones.
fn dedupe_ids(data: &mut Dataset) {
    let mut seen = HashSet::new();
    let mut claim = |id: &mut String| {
        while !seen.insert(id.clone()) {
            warn!(id = %id, "duplicate id, reassigning");
            *id = generate_id();
        }
    };

    data.tasks.iter_mut().for_each(|t| claim(&mut t.id));
    data.cases.iter_mut().for_each(|c| claim(&mut c.id));
    data.contacts.iter_mut().for_each(|c| claim(&mut c.id));
    data.ai_insights.iter_mut().for_each(|i| claim(&mut i.id));
}

/// Make entity insight-id lists match the insight list exactly.
pub(crate) fn reconcile_insight_links(data: &mut Dataset) {
    let owned: Vec<(EntityType, &str, &str)> = data
        .ai_insights
        .iter()
        .map(|i| (i.entity_type, i.entity_id.as_str(), i.id.as_str()))
        .collect();

    let ids_for = |entity_type: EntityType, entity_id: &str| -> Vec<String> {
        owned
            .iter()
            .filter(|(t, e, _)| *t == entity_type && *e == entity_id)
            .map(|(_, _, id)| id.to_string())
            .collect()
    };

    for task in &mut data.tasks {
        task.ai_insights = ids_for(EntityType::Task, &task.id);
    }
    for case in &mut data.cases {
        case.ai_insights = ids_for(EntityType::Case, &case.id);
    }
}

// ==================== FIELD HELPERS ====================

fn first<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Ids were sometimes stored as numbers
fn id_field(obj: &Object) -> Option<String> {
    match obj.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field(obj: &Object, keys: &[&str]) -> Option<String> {
    match first(obj, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bool_field(obj: &Object, keys: &[&str]) -> Option<bool> {
    first(obj, keys)?.as_bool()
}

fn f64_field(obj: &Object, keys: &[&str]) -> Option<f64> {
    match first(obj, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A list of strings; a comma-separated string is split
fn string_list(obj: &Object, keys: &[&str]) -> Vec<String> {
    match first(obj, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn time_field(obj: &Object, keys: &[&str]) -> Option<DateTime<Utc>> {
    parse_time(first(obj, keys)?)
}

pub(crate) fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
            Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
        }
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}

/// Deserialize a nested structure, treating a malformed one as absent
fn typed_field<T: for<'de> Deserialize<'de>>(obj: &Object, keys: &[&str]) -> Option<T> {
    first(obj, keys).and_then(|v| T::deserialize(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::test_support::FlakyKv;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_task_defaults() {
        let now = Utc::now();
        let task = normalize_task(&json!({"id": "t1", "title": "Call clerk"}), now).unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.status, TaskStatus::Inbox);
        assert_eq!(task.priority, Priority::P3);
        assert!(task.tags.is_empty());
        assert!(task.case_ids.is_empty());
        assert!(task.ai_insights.is_empty());
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_task_legacy_shapes() {
        let now = Utc::now();
        let task = normalize_task(
            &json!({
                "id": 42,
                "name": "File brief",
                "completed": true,
                "priority": "high",
                "caseIds": ["c1", 7],
                "tags": "court, urgent",
                "createdAt": 1_700_000_000_000i64,
                "dueDate": "2024-03-01"
            }),
            now,
        )
        .unwrap();

        assert_eq!(task.id, "42");
        assert_eq!(task.title, "File brief");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.priority, Priority::P1);
        assert_eq!(task.case_ids, vec!["c1".to_string(), "7".to_string()]);
        assert_eq!(task.tags, vec!["court".to_string(), "urgent".to_string()]);
        assert_eq!(task.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(task.updated_at, task.created_at);
        assert_eq!(task.due_date.unwrap().format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn test_missing_id_and_title_filled() {
        let task = normalize_task(&json!({}), Utc::now()).unwrap();
        assert!(!task.id.is_empty());
        assert_eq!(task.title, UNTITLED_TASK);
    }

    #[test]
    fn test_non_object_record_skipped() {
        assert!(normalize_task(&json!("just a string"), Utc::now()).is_none());
        let tasks = normalize_list(Some(&json!([{"title": "ok"}, 3, null])), "task", |v| {
            normalize_task(v, Utc::now())
        });
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_case_and_contact_defaults() {
        let now = Utc::now();
        let case = normalize_case(&json!({"title": "Doe v. Roe", "clientName": "Jane Doe"}), now).unwrap();
        assert_eq!(case.client_name, "Jane Doe");
        assert_eq!(case.case_type, DEFAULT_CASE_TYPE);
        assert_eq!(case.status, CaseStatus::Active);

        let contact = normalize_contact(&json!({"firstName": "Sam", "type": "expert_witness"}), now).unwrap();
        assert_eq!(contact.first_name, "Sam");
        assert_eq!(contact.last_name, "");
        assert_eq!(contact.contact_type, ContactType::ExpertWitness);
        assert!(contact.connections.is_none());
    }

    #[test]
    fn test_insight_flat_legacy_payload() {
        let insight = normalize_insight(
            &json!({
                "id": "i1",
                "type": "workflow_suggestion",
                "entityId": "t1",
                "entityType": "task",
                "data": {"title": "Batch calls", "steps": ["a"]},
                "confidence": 0.9,
                "createdAt": "2024-01-01T00:00:00Z"
            }),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(insight.payload.kind(), "workflow_suggestion");
        assert!(!insight.dismissed);
    }

    #[test]
    fn test_insight_without_owner_kept_detached() {
        let value = json!({"id": "i9", "payload": {"type": "workflow_suggestion", "title": "x"}});
        let insight = normalize_insight(&value, Utc::now()).unwrap();
        assert_eq!(insight.id, "i9");
        assert_eq!(insight.entity_id, "");
        assert_eq!(insight.payload.kind(), "workflow_suggestion");
        assert!(normalize_insight(&json!(["not", "an", "object"]), Utc::now()).is_none());
    }

    #[test]
    fn test_version_migration_keeps_foreign_cross_connection() {
        let old = json!({
            "version": "1.0",
            "cases": [{"id": "c1", "title": "Estate"}],
            "ai_insights": [
                {"id": "i1", "type": "cross_connection", "entityId": "c1", "entityType": "case",
                 "data": {"connectedTo": "c2", "reason": "same client"},
                 "confidence": 0.6, "createdAt": "2024-01-01T00:00:00Z"}
            ]
        });

        let data = migrate_version(old, Utc::now());
        assert_eq!(data.ai_insights.len(), 1);
        let insight = &data.ai_insights[0];
        assert_eq!(insight.payload.kind(), "cross_connection");
        assert!(matches!(insight.payload, InsightPayload::Unrecognized(_)));
        assert_eq!(data.cases[0].ai_insights, vec!["i1".to_string()]);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["ai_insights"][0]["payload"]["reason"], "same client");
    }

    #[test]
    fn test_load_keeps_foreign_insights_in_storage() {
        let db = Database::open_memory().unwrap();
        db.set(
            crate::store::STORAGE_KEY,
            &json!({
                "version": "1.0",
                "ai_insights": [{"id": "i1", "entityId": "t1", "entityType": "task",
                                 "payload": {"type": "astrology", "sign": "leo"}}]
            })
            .to_string(),
        )
        .unwrap();

        let data = crate::store::load_data(&db).unwrap();
        assert_eq!(data.ai_insights.len(), 1);

        let again = crate::store::load_data(&db).unwrap();
        assert_eq!(again.ai_insights[0].payload.kind(), "astrology");
    }

    #[test]
    fn test_version_migration_adds_new_sections() {
        let old = json!({
            "version": "1.0",
            "tasks": [{"id": "t1", "title": "Old task", "insight_ids": ["gone"]}],
            "cases": [{"id": "c1", "title": "Old case"}]
        });

        let data = migrate_version(old, Utc::now());
        assert_eq!(data.version, DATA_VERSION);
        assert_eq!(data.tasks.len(), 1);
        assert_eq!(data.cases.len(), 1);
        assert!(data.ai_insights.is_empty());
        assert_eq!(data.ai_settings, AiSettings::default());
        // dangling insight ids are dropped
        assert!(data.tasks[0].ai_insights.is_empty());
    }

    #[test]
    fn test_version_migration_links_insights() {
        let old = json!({
            "version": "1.5",
            "tasks": [{"id": "t1", "title": "x"}],
            "ai_insights": [
                {"id": "i1", "entityId": "t1", "entityType": "task",
                 "payload": {"type": "task_enhancement", "next_steps": ["call"]},
                 "confidence": 0.8, "createdAt": "2024-01-01T00:00:00Z"},
                {"id": "i2", "entityId": "t1", "entityType": "task",
                 "payload": {"type": "astrology"}}
            ],
            "ai_settings": {"confidenceThreshold": 0.5}
        });

        let data = migrate_version(old, Utc::now());
        assert_eq!(data.ai_insights.len(), 2);
        assert_eq!(data.ai_insights[1].payload.kind(), "astrology");
        assert_eq!(
            data.tasks[0].ai_insights,
            vec!["i1".to_string(), "i2".to_string()]
        );
        assert_eq!(data.ai_settings.confidence_threshold, 0.5);
    }

    #[test]
    fn test_duplicate_ids_reassigned() {
        let old = json!({
            "tasks": [{"id": "same", "title": "a"}, {"id": "same", "title": "b"}]
        });
        let data = migrate_version(old, Utc::now());
        assert_eq!(data.tasks[0].id, "same");
        assert_ne!(data.tasks[1].id, "same");
    }

    #[test]
    fn test_legacy_import_survives_bad_key() {
        let db = Database::open_memory().unwrap();
        db.set(LEGACY_TASKS_KEY, r#"[{"id":"t1","title":"Legacy task","case_ids":["c1"]}]"#)
            .unwrap();
        db.set(LEGACY_CASES_KEY, "{{{ broken").unwrap();
        db.set(LEGACY_CONTACTS_KEY, r#"[{"id":"p1","first_name":"Lee"}]"#).unwrap();

        let (data, report) = migrate_legacy(&db, Utc::now());
        assert_eq!(report.tasks, 1);
        assert_eq!(report.cases, 0);
        assert_eq!(report.contacts, 1);
        assert_eq!(report.failed_keys, vec![LEGACY_CASES_KEY.to_string()]);
        assert_eq!(data.tasks[0].case_ids, vec!["c1".to_string()]);
        assert_eq!(data.contacts[0].first_name, "Lee");
    }

    #[test]
    fn test_legacy_read_error_does_not_abort() {
        let kv = FlakyKv::default();
        kv.set(LEGACY_CONTACTS_KEY, r#"[{"first_name":"Kim"}]"#).unwrap();
        *kv.fail_reads_for.borrow_mut() = Some(LEGACY_TASKS_KEY.to_string());

        let (data, report) = migrate_legacy(&kv, Utc::now());
        assert_eq!(report.failed_keys, vec![LEGACY_TASKS_KEY.to_string()]);
        assert_eq!(data.contacts.len(), 1);
    }

    #[test]
    fn test_load_runs_legacy_import_and_saves() {
        let db = Database::open_memory().unwrap();
        db.set(LEGACY_TASKS_KEY, r#"[{"title":"From the old days"}]"#).unwrap();

        let data = crate::store::load_data(&db).unwrap();
        assert_eq!(data.tasks.len(), 1);
        assert!(db.get(crate::store::STORAGE_KEY).unwrap().is_some());

        // second load reads the unified key, not the legacy one
        db.set(LEGACY_TASKS_KEY, "[]").unwrap();
        let again = crate::store::load_data(&db).unwrap();
        assert_eq!(again.tasks.len(), 1);
    }

    #[test]
    fn test_load_upgrades_old_version() {
        let db = Database::open_memory().unwrap();
        let created = (Utc::now() - Duration::days(2)).to_rfc3339();
        db.set(
            crate::store::STORAGE_KEY,
            &json!({"version": "1.0", "tasks": [{"id": "t1", "title": "x", "created_at": created}]})
                .to_string(),
        )
        .unwrap();

        let data = crate::store::load_data(&db).unwrap();
        assert_eq!(data.version, DATA_VERSION);
        assert_eq!(data.tasks[0].priority, Priority::P3);

        let stored: Value =
            serde_json::from_str(&db.get(crate::store::STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored["version"], DATA_VERSION);
        assert_eq!(stored["ai_settings"]["confidenceThreshold"], 0.7);
    }

    #[test]
    fn test_load_repairs_current_version_with_missing_fields() {
        let db = Database::open_memory().unwrap();
        db.set(
            crate::store::STORAGE_KEY,
            &json!({"version": DATA_VERSION, "tasks": [{"title": "no id or dates"}]}).to_string(),
        )
        .unwrap();

        let data = crate::store::load_data(&db).unwrap();
        assert_eq!(data.tasks.len(), 1);
        assert!(!data.tasks[0].id.is_empty());
    }
}
