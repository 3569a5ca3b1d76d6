//! Validation findings.
//!
//! A finding is one diagnostic produced by the engine. Findings carry a
//! stable kind tag that renderers key on, a severity, and optional
//! pointers to the entity and field involved.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EntityKind;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    /// Never produced by the engine itself; reserved for collaborator findings.
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of findings.
///
/// Serializes as the plain tag string (e.g. `"duplicate_id"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FindingKind {
    /// Required columns absent from the collection's first record.
    MissingColumns,
    /// Two entities of one kind share an ID.
    DuplicateId,
    /// Client priority outside the allowed range.
    InvalidPriority,
    /// JSON-looking attributes that do not parse.
    InvalidJson,
    /// Attributes field holding plain text.
    NonJsonAttributes,
    /// Available slots decode to something other than an array.
    InvalidSlotsFormat,
    /// Available slots contain non-positive or non-integer values.
    InvalidSlotValues,
    /// Available slots missing or not valid JSON.
    UnparseableSlots,
    /// Task duration not a number or below the minimum.
    InvalidDuration,
    /// Worker max load not a number or negative.
    InvalidMaxLoad,
    /// Task max-concurrent not a number or below one.
    InvalidMaxConcurrent,
    /// Client requests tasks that do not exist.
    MissingTaskReferences,
    /// Worker max load exceeds its number of available phases.
    OverloadedWorker,
    /// Required skills no worker has.
    MissingSkillCoverage,
    /// More concurrent workers needed than qualified workers exist.
    MaxConcurrencyInfeasible,
    /// Task demand in a phase exceeds worker capacity.
    PhaseSlotSaturation,
    /// Co-run rules form a dependency cycle.
    CircularCorunGroup,
    /// Co-run group members share no allowed phase.
    ConflictingRules,
    /// Rule names a task, group or rule that does not exist.
    UnknownRuleReference,
    /// Pattern-match rule holds an invalid regular expression.
    InvalidRulePattern,
    /// Collaborator-defined tag.
    Custom(String),
}

impl FindingKind {
    /// Stable tag string.
    pub fn as_str(&self) -> &str {
        match self {
            FindingKind::MissingColumns => "missing_columns",
            FindingKind::DuplicateId => "duplicate_id",
            FindingKind::InvalidPriority => "invalid_priority",
            FindingKind::InvalidJson => "invalid_json",
            FindingKind::NonJsonAttributes => "non_json_attributes",
            FindingKind::InvalidSlotsFormat => "invalid_slots_format",
            FindingKind::InvalidSlotValues => "invalid_slot_values",
            FindingKind::UnparseableSlots => "unparseable_slots",
            FindingKind::InvalidDuration => "invalid_duration",
            FindingKind::InvalidMaxLoad => "invalid_max_load",
            FindingKind::InvalidMaxConcurrent => "invalid_max_concurrent",
            FindingKind::MissingTaskReferences => "missing_task_references",
            FindingKind::OverloadedWorker => "overloaded_worker",
            FindingKind::MissingSkillCoverage => "missing_skill_coverage",
            FindingKind::MaxConcurrencyInfeasible => "max_concurrency_infeasible",
            FindingKind::PhaseSlotSaturation => "phase_slot_saturation",
            FindingKind::CircularCorunGroup => "circular_corun_group",
            FindingKind::ConflictingRules => "conflicting_rules",
            FindingKind::UnknownRuleReference => "unknown_rule_reference",
            FindingKind::InvalidRulePattern => "invalid_rule_pattern",
            FindingKind::Custom(tag) => tag,
        }
    }

    /// Severity the engine assigns to this kind.
    pub fn default_severity(&self) -> Severity {
        match self {
            FindingKind::NonJsonAttributes | FindingKind::UnknownRuleReference => {
                Severity::Warning
            }
            FindingKind::Custom(_) => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl From<String> for FindingKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "missing_columns" => FindingKind::MissingColumns,
            "duplicate_id" => FindingKind::DuplicateId,
            "invalid_priority" => FindingKind::InvalidPriority,
            "invalid_json" => FindingKind::InvalidJson,
            "non_json_attributes" => FindingKind::NonJsonAttributes,
            "invalid_slots_format" => FindingKind::InvalidSlotsFormat,
            "invalid_slot_values" => FindingKind::InvalidSlotValues,
            "unparseable_slots" => FindingKind::UnparseableSlots,
            "invalid_duration" => FindingKind::InvalidDuration,
            "invalid_max_load" => FindingKind::InvalidMaxLoad,
            "invalid_max_concurrent" => FindingKind::InvalidMaxConcurrent,
            "missing_task_references" => FindingKind::MissingTaskReferences,
            "overloaded_worker" => FindingKind::OverloadedWorker,
            "missing_skill_coverage" => FindingKind::MissingSkillCoverage,
            "max_concurrency_infeasible" => FindingKind::MaxConcurrencyInfeasible,
            "phase_slot_saturation" => FindingKind::PhaseSlotSaturation,
            "circular_corun_group" => FindingKind::CircularCorunGroup,
            "conflicting_rules" => FindingKind::ConflictingRules,
            "unknown_rule_reference" => FindingKind::UnknownRuleReference,
            "invalid_rule_pattern" => FindingKind::InvalidRulePattern,
            _ => FindingKind::Custom(tag),
        }
    }
}

impl From<FindingKind> for String {
    fn from(kind: FindingKind) -> Self {
        match kind {
            FindingKind::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    /// Kind tag.
    #[serde(rename = "type")]
    pub kind: FindingKind,
    /// Severity.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Collection the finding belongs to.
    pub entity_type: EntityKind,
    /// Offending entity, when the finding is about one entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Offending field, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationFinding {
    /// Creates a finding with the kind's default severity.
    pub fn new(kind: FindingKind, entity_type: EntityKind, message: impl Into<String>) -> Self {
        Self {
            severity: kind.default_severity(),
            kind,
            message: message.into(),
            entity_type,
            entity_id: None,
            field: None,
            suggestion: None,
        }
    }

    /// Sets the entity ID.
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Sets the field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the remediation hint.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Overrides the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
