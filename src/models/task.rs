//! Task model.
//!
//! A task is a unit of work that occupies `Duration` phase-units, needs a
//! set of skills, and may prefer particular phases.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{fields, Entity, EntityKind, Record};

/// A task row.
///
/// `PreferredPhases` accepts either JSON array text (`"[1,2,3]"`) or a
/// dash range (`"1-3"`); see [`parse_preferred_phases`](crate::parsing::parse_preferred_phases).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    record: Record,
}

impl Task {
    /// Creates a task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            record: Record::new().with(fields::TASK_ID, id.into()),
        }
    }

    /// Wraps an existing row.
    pub fn from_record(record: Record) -> Self {
        Self { record }
    }

    /// Sets the task name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field(fields::TASK_NAME, name.into())
    }

    /// Sets the task category.
    pub fn with_category(self, category: impl Into<String>) -> Self {
        self.with_field(fields::CATEGORY, category.into())
    }

    /// Sets the duration in phase-units.
    pub fn with_duration(self, duration: impl Into<Value>) -> Self {
        self.with_field(fields::DURATION, duration)
    }

    /// Sets the comma-separated required skills.
    pub fn with_required_skills(self, skills: impl Into<String>) -> Self {
        self.with_field(fields::REQUIRED_SKILLS, skills.into())
    }

    /// Sets the preferred phases (`"[1,2]"` or `"1-3"`).
    pub fn with_preferred_phases(self, phases: impl Into<String>) -> Self {
        self.with_field(fields::PREFERRED_PHASES, phases.into())
    }

    /// Sets the number of workers needed simultaneously.
    pub fn with_max_concurrent(self, n: impl Into<Value>) -> Self {
        self.with_field(fields::MAX_CONCURRENT, n)
    }

    /// Sets an arbitrary field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.set(key, value);
        self
    }

    /// Raw required-skill list.
    pub fn required_skills(&self) -> Option<String> {
        self.record.text(fields::REQUIRED_SKILLS)
    }

    /// Raw preferred-phase text.
    pub fn preferred_phases(&self) -> Option<String> {
        self.record.text(fields::PREFERRED_PHASES)
    }

    /// Raw duration value.
    pub fn duration(&self) -> Option<&Value> {
        self.record.value(fields::DURATION)
    }

    /// Raw max-concurrent value.
    pub fn max_concurrent(&self) -> Option<&Value> {
        self.record.value(fields::MAX_CONCURRENT)
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Tasks;

    fn record(&self) -> &Record {
        &self.record
    }
}
