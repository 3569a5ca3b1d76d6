//! Validation and rule-consistency engine.
//!
//! Runs every check over clients, workers, tasks and active business
//! rules, and returns the complete ordered finding list. Checks run in a
//! fixed order with no early exit:
//!
//! 1. Per-entity: clients, then workers, then tasks
//!    (required columns, unique IDs, field ranges, embedded JSON)
//! 2. Cross-entity: task references, worker overload, skill coverage,
//!    max-concurrency feasibility, phase-slot saturation
//! 3. Rule consistency: circular co-run groups, co-run vs. phase-window
//!    conflicts, rule references
//!
//! Malformed data becomes findings; nothing in the input can make
//! validation fail. Each call builds its own finding list, so a
//! [`Validator`] can be shared across threads and reused freely.
//!
//! # Usage
//!
//! ```
//! use u_feasibility::models::{BusinessRule, EntitySet, Task, Worker};
//! use u_feasibility::validation::{validate, ValidationSummary};
//!
//! let entities = EntitySet::new()
//!     .with_worker(Worker::new("W1").with_slots("[1,2]").with_max_load(5))
//!     .with_task(Task::new("T1").with_duration(1));
//! let rules = vec![BusinessRule::co_run("R1", ["T1", "T2", "T3"])];
//!
//! let findings = validate(&entities, &rules);
//! let summary = ValidationSummary::from_findings(&findings);
//! assert!(summary.has_errors());
//! ```

mod config;
mod consistency;
mod cross;
mod entity;
mod summary;

pub use config::ValidatorConfig;
pub use summary::ValidationSummary;

use tracing::{debug, debug_span};

use crate::models::{BusinessRule, EntitySet, ValidationFinding};

/// Validates entities and rules with the default configuration.
///
/// Shorthand for `Validator::default().validate(entities, rules)`.
pub fn validate(entities: &EntitySet, rules: &[BusinessRule]) -> Vec<ValidationFinding> {
    Validator::default().validate(entities, rules)
}

/// The validation engine.
///
/// Holds configuration only; findings never outlive a call.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Creates a validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Runs all checks and returns the findings in check order.
    ///
    /// Deterministic: identical inputs give identical output. Inputs are
    /// only borrowed immutably.
    pub fn validate(
        &self,
        entities: &EntitySet,
        rules: &[BusinessRule],
    ) -> Vec<ValidationFinding> {
        let _span = debug_span!(
            "validate",
            clients = entities.clients.len(),
            workers = entities.workers.len(),
            tasks = entities.tasks.len(),
            rules = rules.len()
        )
        .entered();

        let mut findings = Vec::new();

        entity::check_clients(&entities.clients, &self.config, &mut findings);
        entity::check_workers(&entities.workers, &mut findings);
        entity::check_tasks(&entities.tasks, &self.config, &mut findings);
        debug!(count = findings.len(), "per-entity checks done");

        let before = findings.len();
        cross::check_cross_entity(entities, &self.config, &mut findings);
        debug!(count = findings.len() - before, "cross-entity checks done");

        let before = findings.len();
        consistency::check_rules(entities, rules, &self.config, &mut findings);
        debug!(count = findings.len() - before, "rule-consistency checks done");

        let summary = ValidationSummary::from_findings(&findings);
        debug!(
            errors = summary.errors,
            warnings = summary.warnings,
            info = summary.info,
            "validation finished"
        );

        findings
    }
}
