//! Finding summary.
//!
//! Aggregates a finding list into counts a caller can show or gate on.
//!
//! | Measure | Definition |
//! |---------|-----------|
//! | errors / warnings / info | Findings per severity |
//! | by_kind | Findings per kind tag |
//! | by_entity | Findings per entity collection |

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{EntityKind, Severity, ValidationFinding};

/// Counts over a finding list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    /// Kind tag → count.
    pub by_kind: BTreeMap<String, usize>,
    /// Entity collection → count.
    pub by_entity: BTreeMap<EntityKind, usize>,
}

impl ValidationSummary {
    /// Summarizes a finding list.
    pub fn from_findings(findings: &[ValidationFinding]) -> Self {
        let mut summary = Self {
            total: findings.len(),
            ..Self::default()
        };

        for f in findings {
            match f.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
            *summary
                .by_kind
                .entry(f.kind.as_str().to_string())
                .or_insert(0) += 1;
            *summary.by_entity.entry(f.entity_type).or_insert(0) += 1;
        }

        summary
    }

    /// Whether any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Whether there are no findings at all.
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }
}
