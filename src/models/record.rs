//! Loosely-typed rows and entity kinds.
//!
//! Ingestion hands the engine flat rows whose values may be numbers,
//! strings holding numbers, or strings holding small embedded formats
//! (comma lists, JSON arrays, phase ranges). A [`Record`] keeps those
//! values exactly as received; typed interpretation happens in
//! [`parsing`](crate::parsing) at the point of use.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Column names used by the three entity kinds.
pub mod fields {
    pub const CLIENT_ID: &str = "ClientID";
    pub const CLIENT_NAME: &str = "ClientName";
    pub const PRIORITY_LEVEL: &str = "PriorityLevel";
    pub const REQUESTED_TASK_IDS: &str = "RequestedTaskIDs";
    pub const GROUP_TAG: &str = "GroupTag";
    pub const ATTRIBUTES_JSON: &str = "AttributesJSON";

    pub const WORKER_ID: &str = "WorkerID";
    pub const WORKER_NAME: &str = "WorkerName";
    pub const SKILLS: &str = "Skills";
    pub const AVAILABLE_SLOTS: &str = "AvailableSlots";
    pub const MAX_LOAD_PER_PHASE: &str = "MaxLoadPerPhase";
    pub const WORKER_GROUP: &str = "WorkerGroup";
    pub const QUALIFICATION_LEVEL: &str = "QualificationLevel";

    pub const TASK_ID: &str = "TaskID";
    pub const TASK_NAME: &str = "TaskName";
    pub const CATEGORY: &str = "Category";
    pub const DURATION: &str = "Duration";
    pub const REQUIRED_SKILLS: &str = "RequiredSkills";
    pub const PREFERRED_PHASES: &str = "PreferredPhases";
    pub const MAX_CONCURRENT: &str = "MaxConcurrent";
}

/// The three entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Clients,
    Workers,
    Tasks,
}

impl EntityKind {
    /// Name of the identifier column.
    pub fn id_field(self) -> &'static str {
        match self {
            EntityKind::Clients => fields::CLIENT_ID,
            EntityKind::Workers => fields::WORKER_ID,
            EntityKind::Tasks => fields::TASK_ID,
        }
    }

    /// Columns every collection of this kind must carry.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Clients => &[
                fields::CLIENT_ID,
                fields::CLIENT_NAME,
                fields::PRIORITY_LEVEL,
                fields::REQUESTED_TASK_IDS,
            ],
            EntityKind::Workers => &[
                fields::WORKER_ID,
                fields::WORKER_NAME,
                fields::SKILLS,
                fields::AVAILABLE_SLOTS,
                fields::MAX_LOAD_PER_PHASE,
            ],
            EntityKind::Tasks => &[
                fields::TASK_ID,
                fields::TASK_NAME,
                fields::DURATION,
                fields::REQUIRED_SKILLS,
            ],
        }
    }

    /// Collection name as used in findings (`clients`, `workers`, `tasks`).
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Clients => "clients",
            EntityKind::Workers => "workers",
            EntityKind::Tasks => "tasks",
        }
    }

    /// Singular, capitalized label for messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Clients => "Client",
            EntityKind::Workers => "Worker",
            EntityKind::Tasks => "Task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flat row: field name → raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a field value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether the field is present as a key (even if null or blank).
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Textual form of a field, or `None` when absent.
    ///
    /// Strings are trimmed; blank strings and `null` count as absent.
    /// Numbers and booleans are rendered, arrays and objects become JSON text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// The field value, or `None` when absent (missing, `null` or blank).
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            v => Some(v),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A row belonging to one of the three entity kinds.
pub trait Entity {
    /// Which collection this entity lives in.
    const KIND: EntityKind;

    /// The underlying row.
    fn record(&self) -> &Record;

    /// Identifier value, if present.
    fn id(&self) -> Option<String> {
        self.record().text(Self::KIND.id_field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_field_table() {
        assert_eq!(EntityKind::Clients.id_field(), "ClientID");
        assert_eq!(EntityKind::Workers.id_field(), "WorkerID");
        assert_eq!(EntityKind::Tasks.id_field(), "TaskID");
        for kind in [EntityKind::Clients, EntityKind::Workers, EntityKind::Tasks] {
            assert_eq!(kind.required_fields()[0], kind.id_field());
        }
    }

    #[test]
    fn test_record_text() {
        let r = Record::new()
            .with("a", "  x ")
            .with("b", 3)
            .with("c", "   ")
            .with("d", Value::Null)
            .with("e", json!([1, 2]));

        assert_eq!(r.text("a"), Some("x".to_string()));
        assert_eq!(r.text("b"), Some("3".to_string()));
        assert_eq!(r.text("c"), None);
        assert_eq!(r.text("d"), None);
        assert_eq!(r.text("e"), Some("[1,2]".to_string()));
        assert_eq!(r.text("missing"), None);
        assert!(r.has_field("c"));
        assert!(r.value("c").is_none());
    }

    #[test]
    fn test_record_deserialize_row() {
        let r: Record = serde_json::from_value(json!({
            "ClientID": "C1",
            "PriorityLevel": "3"
        }))
        .unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["ClientID", "PriorityLevel"]);
    }

    #[test]
    fn test_entity_kind_serde() {
        assert_eq!(serde_json::to_string(&EntityKind::Workers).unwrap(), "\"workers\"");
        assert_eq!(EntityKind::Tasks.to_string(), "tasks");
    }
}
