//! Business rules.
//!
//! Rules are authored outside the engine (form builder or assisted
//! drafting) and arrive as `{id, type, name, description, parameters,
//! isActive, createdAt}` documents. The parameter bag is decoded into a
//! typed [`RuleKind`] variant when the rule is constructed, so a shape
//! mismatch fails deserialization instead of surfacing inside a check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::RuleError;

/// Rule type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    CoRun,
    LoadLimit,
    PhaseWindow,
    SlotRestriction,
    PatternMatch,
    Precedence,
}

impl RuleType {
    /// Wire tag (`coRun`, `loadLimit`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::CoRun => "coRun",
            RuleType::LoadLimit => "loadLimit",
            RuleType::PhaseWindow => "phaseWindow",
            RuleType::SlotRestriction => "slotRestriction",
            RuleType::PatternMatch => "patternMatch",
            RuleType::Precedence => "precedence",
        }
    }

    /// Parses a wire tag.
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "coRun" => RuleType::CoRun,
            "loadLimit" => RuleType::LoadLimit,
            "phaseWindow" => RuleType::PhaseWindow,
            "slotRestriction" => RuleType::SlotRestriction,
            "patternMatch" => RuleType::PatternMatch,
            "precedence" => RuleType::Precedence,
            _ => return None,
        })
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listed tasks must run in the same phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoRunParams {
    pub task_ids: Vec<String>,
}

/// Workers of a group may take at most `max_slots_per_phase` tasks per phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadLimitParams {
    pub worker_group: String,
    pub max_slots_per_phase: u32,
}

/// A task may only run in the listed phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseWindowParams {
    pub task_id: String,
    pub allowed_phases: Vec<i64>,
}

/// Members of a client or worker group must share at least
/// `min_common_slots` phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRestrictionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_group: Option<String>,
    pub min_common_slots: u32,
}

/// Applies `template` to entities whose fields match `regex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatchParams {
    pub regex: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Explicit priority order between rules (earlier wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecedenceParams {
    pub rule_ids: Vec<String>,
}

/// Rule parameters, keyed by rule type.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    CoRun(CoRunParams),
    LoadLimit(LoadLimitParams),
    PhaseWindow(PhaseWindowParams),
    SlotRestriction(SlotRestrictionParams),
    PatternMatch(PatternMatchParams),
    Precedence(PrecedenceParams),
}

impl RuleKind {
    /// The type tag of this variant.
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::CoRun(_) => RuleType::CoRun,
            RuleKind::LoadLimit(_) => RuleType::LoadLimit,
            RuleKind::PhaseWindow(_) => RuleType::PhaseWindow,
            RuleKind::SlotRestriction(_) => RuleType::SlotRestriction,
            RuleKind::PatternMatch(_) => RuleType::PatternMatch,
            RuleKind::Precedence(_) => RuleType::Precedence,
        }
    }

    fn to_parameters(&self) -> Value {
        let value = match self {
            RuleKind::CoRun(p) => serde_json::to_value(p),
            RuleKind::LoadLimit(p) => serde_json::to_value(p),
            RuleKind::PhaseWindow(p) => serde_json::to_value(p),
            RuleKind::SlotRestriction(p) => serde_json::to_value(p),
            RuleKind::PatternMatch(p) => serde_json::to_value(p),
            RuleKind::Precedence(p) => serde_json::to_value(p),
        };
        // Plain structs of strings and integers always serialize.
        value.unwrap_or(Value::Null)
    }
}

/// A user-defined business rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct BusinessRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: RuleKind,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl BusinessRule {
    /// Creates an active rule with the given kind.
    pub fn new(id: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            kind,
            is_active: true,
            created_at: None,
        }
    }

    /// Creates a co-run rule.
    pub fn co_run<S: Into<String>>(
        id: impl Into<String>,
        task_ids: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::CoRun(CoRunParams {
                task_ids: task_ids.into_iter().map(Into::into).collect(),
            }),
        )
    }

    /// Creates a phase-window rule.
    pub fn phase_window(
        id: impl Into<String>,
        task_id: impl Into<String>,
        allowed_phases: Vec<i64>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::PhaseWindow(PhaseWindowParams {
                task_id: task_id.into(),
                allowed_phases,
            }),
        )
    }

    /// Creates a load-limit rule.
    pub fn load_limit(
        id: impl Into<String>,
        worker_group: impl Into<String>,
        max_slots_per_phase: u32,
    ) -> Self {
        Self::new(
            id,
            RuleKind::LoadLimit(LoadLimitParams {
                worker_group: worker_group.into(),
                max_slots_per_phase,
            }),
        )
    }

    /// Creates a slot-restriction rule over a client group, a worker group, or both.
    pub fn slot_restriction(
        id: impl Into<String>,
        client_group: Option<&str>,
        worker_group: Option<&str>,
        min_common_slots: u32,
    ) -> Self {
        Self::new(
            id,
            RuleKind::SlotRestriction(SlotRestrictionParams {
                client_group: client_group.map(str::to_string),
                worker_group: worker_group.map(str::to_string),
                min_common_slots,
            }),
        )
    }

    /// Creates a pattern-match rule.
    pub fn pattern_match(
        id: impl Into<String>,
        regex: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::PatternMatch(PatternMatchParams {
                regex: regex.into(),
                template: template.into(),
                parameters: Map::new(),
            }),
        )
    }

    /// Creates a precedence rule.
    pub fn precedence<S: Into<String>>(
        id: impl Into<String>,
        rule_ids: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::Precedence(PrecedenceParams {
                rule_ids: rule_ids.into_iter().map(Into::into).collect(),
            }),
        )
    }

    /// Sets the rule name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets whether the rule participates in validation.
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The type tag.
    pub fn rule_type(&self) -> RuleType {
        self.kind.rule_type()
    }

    /// Name for messages: the rule name, or its ID when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

fn default_active() -> bool {
    true
}

/// Wire form of a [`BusinessRule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawRule> for BusinessRule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let rule_type = RuleType::parse(&raw.rule_type)
            .ok_or_else(|| RuleError::UnknownType(raw.rule_type.clone()))?;

        let invalid = |source| RuleError::InvalidParameters {
            rule_id: raw.id.clone(),
            rule_type: raw.rule_type.clone(),
            source,
        };
        let params = raw.parameters;
        let kind = match rule_type {
            RuleType::CoRun => RuleKind::CoRun(serde_json::from_value(params).map_err(invalid)?),
            RuleType::LoadLimit => {
                RuleKind::LoadLimit(serde_json::from_value(params).map_err(invalid)?)
            }
            RuleType::PhaseWindow => {
                RuleKind::PhaseWindow(serde_json::from_value(params).map_err(invalid)?)
            }
            RuleType::SlotRestriction => {
                RuleKind::SlotRestriction(serde_json::from_value(params).map_err(invalid)?)
            }
            RuleType::PatternMatch => {
                RuleKind::PatternMatch(serde_json::from_value(params).map_err(invalid)?)
            }
            RuleType::Precedence => {
                RuleKind::Precedence(serde_json::from_value(params).map_err(invalid)?)
            }
        };

        Ok(Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            kind,
            is_active: raw.is_active,
            created_at: raw.created_at,
        })
    }
}

impl From<BusinessRule> for RawRule {
    fn from(rule: BusinessRule) -> Self {
        Self {
            rule_type: rule.rule_type().as_str().to_string(),
            parameters: rule.kind.to_parameters(),
            id: rule.id,
            name: rule.name,
            description: rule.description,
            is_active: rule.is_active,
            created_at: rule.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_co_run_from_json() {
        let rule: BusinessRule = serde_json::from_value(json!({
            "id": "R1",
            "type": "coRun",
            "name": "Pair",
            "description": "Run together",
            "parameters": {"taskIds": ["T1", "T2"]},
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(rule.rule_type(), RuleType::CoRun);
        match &rule.kind {
            RuleKind::CoRun(p) => assert_eq!(p.task_ids, vec!["T1", "T2"]),
            _ => panic!("wrong variant"),
        }
        assert!(rule.created_at.is_some());
    }

    #[test]
    fn test_defaults() {
        let rule: BusinessRule = serde_json::from_value(json!({
            "id": "R2",
            "type": "phaseWindow",
            "parameters": {"taskId": "T1", "allowedPhases": [1, 2]}
        }))
        .unwrap();

        assert!(rule.is_active);
        assert_eq!(rule.display_name(), "R2");
        assert_eq!(rule.created_at, None);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = serde_json::from_value::<BusinessRule>(json!({
            "id": "R3",
            "type": "teleport",
            "parameters": {}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown rule type 'teleport'"));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = serde_json::from_value::<BusinessRule>(json!({
            "id": "R4",
            "type": "loadLimit",
            "parameters": {"workerGroup": "A"}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid parameters for loadLimit rule 'R4'"));
    }

    #[test]
    fn test_serialize_wire_shape() {
        let rule = BusinessRule::load_limit("R5", "GroupA", 3).with_name("Cap A");
        let value = serde_json::to_value(&rule).unwrap();

        assert_eq!(value["type"], "loadLimit");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["parameters"]["workerGroup"], "GroupA");
        assert_eq!(value["parameters"]["maxSlotsPerPhase"], 3);
        assert!(value.get("createdAt").is_none());

        let back: BusinessRule = serde_json::from_value(value).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_builders() {
        let rule = BusinessRule::co_run("R6", ["T1", "T2", "T3"])
            .with_description("trio")
            .with_active(false);
        assert!(!rule.is_active);
        assert_eq!(rule.rule_type().to_string(), "coRun");

        let prec = BusinessRule::precedence("R7", ["R6"]);
        assert_eq!(prec.rule_type(), RuleType::Precedence);

        let slots = BusinessRule::slot_restriction("R8", None, Some("GroupA"), 2);
        let value = serde_json::to_value(&slots).unwrap();
        assert_eq!(value["type"], "slotRestriction");
        assert_eq!(value["parameters"], json!({"workerGroup": "GroupA", "minCommonSlots": 2}));
    }
}
