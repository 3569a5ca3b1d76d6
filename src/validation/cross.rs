//! Cross-entity checks.
//!
//! Checks that span two collections:
//! - client → task reference integrity
//! - worker overload (max load vs. available phases)
//! - skill coverage and max-concurrency feasibility
//! - phase-slot saturation (task demand vs. worker capacity per phase)
//!
//! Values that fail to parse here were already reported by the
//! per-entity checks and are skipped without a second finding.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{
    fields, Client, Entity, EntityKind, EntitySet, FindingKind, Task, ValidationFinding, Worker,
};
use crate::parsing::{
    parse_number, parse_preferred_phases, parse_slots, skill_set, split_list, Phase,
};

use super::entity::entity_finding;
use super::ValidatorConfig;

pub(crate) fn check_cross_entity(
    entities: &EntitySet,
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    check_task_references(&entities.clients, &entities.tasks, findings);
    check_worker_overload(&entities.workers, findings);
    check_skill_coverage(&entities.workers, &entities.tasks, findings);
    check_max_concurrency(&entities.workers, &entities.tasks, findings);
    check_phase_saturation(&entities.workers, &entities.tasks, config, findings);
}

fn check_task_references(
    clients: &[Client],
    tasks: &[Task],
    findings: &mut Vec<ValidationFinding>,
) {
    let known: HashSet<String> = tasks.iter().filter_map(|t| t.id()).collect();

    for client in clients {
        let Some(requested) = client.requested_tasks() else {
            continue;
        };
        let mut unresolved: Vec<&str> = Vec::new();
        for token in split_list(&requested) {
            if !known.contains(token) && !unresolved.contains(&token) {
                unresolved.push(token);
            }
        }

        if !unresolved.is_empty() {
            findings.push(
                entity_finding(
                    FindingKind::MissingTaskReferences,
                    client,
                    format!(
                        "{} requests unknown tasks: {}",
                        subject(client.id(), "Client"),
                        unresolved.join(", ")
                    ),
                )
                .with_field(fields::REQUESTED_TASK_IDS)
                .with_suggestion("Remove the IDs or add the missing tasks"),
            );
        }
    }
}

fn check_worker_overload(workers: &[Worker], findings: &mut Vec<ValidationFinding>) {
    for worker in workers {
        let Ok(slots) = parse_slots(worker.slots()) else {
            continue;
        };
        let Some(max_load) = usable_max_load(worker) else {
            continue;
        };

        if (slots.len() as f64) < max_load {
            findings.push(
                entity_finding(
                    FindingKind::OverloadedWorker,
                    worker,
                    format!(
                        "{} has {} available slots but MaxLoadPerPhase {}",
                        subject(worker.id(), "Worker"),
                        slots.len(),
                        max_load
                    ),
                )
                .with_field(fields::MAX_LOAD_PER_PHASE)
                .with_suggestion(format!(
                    "Lower MaxLoadPerPhase to at most {} or add available slots",
                    slots.len()
                )),
            );
        }
    }
}

fn check_skill_coverage(
    workers: &[Worker],
    tasks: &[Task],
    findings: &mut Vec<ValidationFinding>,
) {
    let available: BTreeSet<String> = workers
        .iter()
        .filter_map(|w| w.skills())
        .flat_map(|s| skill_set(&s))
        .collect();

    for task in tasks {
        let Some(required) = task.required_skills() else {
            continue;
        };
        let mut seen = HashSet::new();
        let uncovered: Vec<&str> = split_list(&required)
            .into_iter()
            .filter(|skill| {
                let key = skill.to_lowercase();
                !available.contains(&key) && seen.insert(key)
            })
            .collect();

        if !uncovered.is_empty() {
            findings.push(
                entity_finding(
                    FindingKind::MissingSkillCoverage,
                    task,
                    format!(
                        "{} requires skills no worker has: {}",
                        subject(task.id(), "Task"),
                        uncovered.join(", ")
                    ),
                )
                .with_field(fields::REQUIRED_SKILLS)
                .with_suggestion("Add workers with these skills or revise RequiredSkills"),
            );
        }
    }
}

fn check_max_concurrency(
    workers: &[Worker],
    tasks: &[Task],
    findings: &mut Vec<ValidationFinding>,
) {
    let worker_skills: Vec<BTreeSet<String>> = workers
        .iter()
        .map(|w| w.skills().map(|s| skill_set(&s)).unwrap_or_default())
        .collect();

    for task in tasks {
        let Some(needed) = usable_max_concurrent(task) else {
            continue;
        };
        let required = task
            .required_skills()
            .map(|s| skill_set(&s))
            .unwrap_or_default();
        let qualified = worker_skills
            .iter()
            .filter(|skills| required.is_subset(skills))
            .count();

        if needed > qualified as f64 {
            findings.push(
                entity_finding(
                    FindingKind::MaxConcurrencyInfeasible,
                    task,
                    format!(
                        "{} needs {} concurrent workers but only {} are qualified",
                        subject(task.id(), "Task"),
                        needed,
                        qualified
                    ),
                )
                .with_field(fields::MAX_CONCURRENT)
                .with_suggestion(format!(
                    "Lower MaxConcurrent to at most {qualified} or add qualified workers"
                )),
            );
        }
    }
}

/// Per-phase worker capacity: Σ MaxLoadPerPhase over each worker's slots.
pub(crate) fn phase_capacity(workers: &[Worker]) -> BTreeMap<Phase, f64> {
    let mut capacity = BTreeMap::new();
    for worker in workers {
        let (Ok(slots), Some(max_load)) = (parse_slots(worker.slots()), usable_max_load(worker))
        else {
            continue;
        };
        for phase in slots {
            *capacity.entry(phase).or_insert(0.0) += max_load;
        }
    }
    capacity
}

/// Per-phase task demand: Σ Duration over each task's preferred phases.
pub(crate) fn phase_demand(tasks: &[Task], config: &ValidatorConfig) -> BTreeMap<Phase, f64> {
    let mut demand = BTreeMap::new();
    for task in tasks {
        let Some(duration) = usable_duration(task, config) else {
            continue;
        };
        let preferred = task.preferred_phases();
        for phase in parse_preferred_phases(preferred.as_deref()) {
            *demand.entry(phase).or_insert(0.0) += duration;
        }
    }
    demand
}

fn check_phase_saturation(
    workers: &[Worker],
    tasks: &[Task],
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    let capacity = phase_capacity(workers);
    let demand = phase_demand(tasks, config);

    for (phase, &needed) in &demand {
        let available = capacity.get(phase).copied().unwrap_or(0.0);
        if needed > available {
            findings.push(
                ValidationFinding::new(
                    FindingKind::PhaseSlotSaturation,
                    EntityKind::Tasks,
                    format!(
                        "Phase {phase} is oversubscribed: task demand {needed} exceeds worker capacity {available}"
                    ),
                )
                .with_field(fields::PREFERRED_PHASES)
                .with_suggestion(format!(
                    "Spread tasks to other phases or add {} units of capacity in phase {phase}",
                    needed - available
                )),
            );
        }
    }
}

fn usable_max_load(worker: &Worker) -> Option<f64> {
    parse_number(worker.max_load())
        .ok()
        .flatten()
        .filter(|m| *m >= 0.0)
}

fn usable_duration(task: &Task, config: &ValidatorConfig) -> Option<f64> {
    parse_number(task.duration())
        .ok()
        .flatten()
        .filter(|d| *d >= config.min_duration)
}

fn usable_max_concurrent(task: &Task) -> Option<f64> {
    parse_number(task.max_concurrent())
        .ok()
        .flatten()
        .filter(|n| *n >= 1.0)
}

fn subject(id: Option<String>, label: &str) -> String {
    match id {
        Some(id) => format!("{label} {id}"),
        None => format!("{label} without ID"),
    }
}
