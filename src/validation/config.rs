//! Validator configuration.

use serde::{Deserialize, Serialize};

use crate::parsing::Phase;

/// Configuration for the [`Validator`](super::Validator).
///
/// # Examples
///
/// ```
/// use u_feasibility::validation::ValidatorConfig;
///
/// let config = ValidatorConfig::default()
///     .with_priority_range(1, 10)
///     .with_unconstrained_phases(vec![1, 2, 3, 4, 5, 6])
///     .with_rule_reference_check(false);
/// assert_eq!(config.max_priority, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Lowest valid `PriorityLevel`.
    pub min_priority: i64,

    /// Highest valid `PriorityLevel`.
    pub max_priority: i64,

    /// Smallest valid `Duration`.
    pub min_duration: f64,

    /// Allowed phases of a co-run member with neither a phase window
    /// nor a `PreferredPhases` value.
    pub unconstrained_phases: Vec<Phase>,

    /// Whether to report rules that name unknown tasks, groups or rules.
    pub check_rule_references: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_priority: 1,
            max_priority: 5,
            min_duration: 1.0,
            unconstrained_phases: (1..=5).collect(),
            check_rule_references: true,
        }
    }
}

impl ValidatorConfig {
    pub fn with_priority_range(mut self, min: i64, max: i64) -> Self {
        self.min_priority = min;
        self.max_priority = max;
        self
    }

    pub fn with_min_duration(mut self, min: f64) -> Self {
        self.min_duration = min;
        self
    }

    pub fn with_unconstrained_phases(mut self, phases: Vec<Phase>) -> Self {
        self.unconstrained_phases = phases;
        self
    }

    pub fn with_rule_reference_check(mut self, enabled: bool) -> Self {
        self.check_rule_references = enabled;
        self
    }
}
