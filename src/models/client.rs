//! Client model.
//!
//! A client is a requester of work: it names the tasks it wants done
//! and carries a priority used by downstream allocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{fields, Entity, EntityKind, Record};

/// A client row.
///
/// Values are kept as received; see [`Record`] for the absent-value rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Client {
    record: Record,
}

impl Client {
    /// Creates a client with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            record: Record::new().with(fields::CLIENT_ID, id.into()),
        }
    }

    /// Wraps an existing row.
    pub fn from_record(record: Record) -> Self {
        Self { record }
    }

    /// Sets the client name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field(fields::CLIENT_NAME, name.into())
    }

    /// Sets the priority level (expected 1..=5).
    pub fn with_priority(self, priority: impl Into<Value>) -> Self {
        self.with_field(fields::PRIORITY_LEVEL, priority)
    }

    /// Sets the comma-separated list of requested task IDs.
    pub fn with_requested_tasks(self, task_ids: impl Into<String>) -> Self {
        self.with_field(fields::REQUESTED_TASK_IDS, task_ids.into())
    }

    /// Sets the group tag.
    pub fn with_group(self, group: impl Into<String>) -> Self {
        self.with_field(fields::GROUP_TAG, group.into())
    }

    /// Sets the attributes JSON text.
    pub fn with_attributes(self, json: impl Into<String>) -> Self {
        self.with_field(fields::ATTRIBUTES_JSON, json.into())
    }

    /// Sets an arbitrary field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.set(key, value);
        self
    }

    /// Raw requested-task list.
    pub fn requested_tasks(&self) -> Option<String> {
        self.record.text(fields::REQUESTED_TASK_IDS)
    }

    /// Group tag, if any.
    pub fn group(&self) -> Option<String> {
        self.record.text(fields::GROUP_TAG)
    }
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Clients;

    fn record(&self) -> &Record {
        &self.record
    }
}
