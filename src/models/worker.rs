//! Worker model.
//!
//! Workers perform tasks. Each worker has a skill list, the phases in
//! which it is available, and a per-phase load ceiling.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{fields, Entity, EntityKind, Record};

/// A worker row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Worker {
    record: Record,
}

impl Worker {
    /// Creates a worker with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            record: Record::new().with(fields::WORKER_ID, id.into()),
        }
    }

    /// Wraps an existing row.
    pub fn from_record(record: Record) -> Self {
        Self { record }
    }

    /// Sets the worker name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field(fields::WORKER_NAME, name.into())
    }

    /// Sets the comma-separated skill list.
    pub fn with_skills(self, skills: impl Into<String>) -> Self {
        self.with_field(fields::SKILLS, skills.into())
    }

    /// Sets the available slots (normally JSON array text such as `"[1,2,3]"`).
    pub fn with_slots(self, slots: impl Into<Value>) -> Self {
        self.with_field(fields::AVAILABLE_SLOTS, slots)
    }

    /// Sets the maximum number of tasks per phase.
    pub fn with_max_load(self, max_load: impl Into<Value>) -> Self {
        self.with_field(fields::MAX_LOAD_PER_PHASE, max_load)
    }

    /// Sets the worker group.
    pub fn with_group(self, group: impl Into<String>) -> Self {
        self.with_field(fields::WORKER_GROUP, group.into())
    }

    /// Sets the qualification level.
    pub fn with_qualification(self, level: i64) -> Self {
        self.with_field(fields::QUALIFICATION_LEVEL, level)
    }

    /// Sets an arbitrary field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.set(key, value);
        self
    }

    /// Raw skill list.
    pub fn skills(&self) -> Option<String> {
        self.record.text(fields::SKILLS)
    }

    /// Raw available-slots value.
    pub fn slots(&self) -> Option<&Value> {
        self.record.value(fields::AVAILABLE_SLOTS)
    }

    /// Raw max-load value.
    pub fn max_load(&self) -> Option<&Value> {
        self.record.value(fields::MAX_LOAD_PER_PHASE)
    }

    /// Worker group, if any.
    pub fn group(&self) -> Option<String> {
        self.record.text(fields::WORKER_GROUP)
    }
}

impl Entity for Worker {
    const KIND: EntityKind = EntityKind::Workers;

    fn record(&self) -> &Record {
        &self.record
    }
}
