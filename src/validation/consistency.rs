//! Rule-consistency checks.
//!
//! Only active rules take part. Detects:
//! - Circular co-run groups (DFS over the co-run graph)
//! - Co-run groups whose members share no allowed phase
//! - Rules naming unknown tasks, groups or rules, and invalid patterns
//!
//! # Co-run graph
//! Every pair of tasks inside one co-run rule is linked in both
//! directions. The DFS does not walk straight back along the edge it
//! arrived on, so a two-task group is not a cycle while three or more
//! mutually linked tasks are.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (Depth-first search)

use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{
    BusinessRule, Entity, EntityKind, EntitySet, FindingKind, RuleKind, Task, ValidationFinding,
};
use crate::parsing::{parse_preferred_phases, Phase};

use super::ValidatorConfig;

pub(crate) fn check_rules(
    entities: &EntitySet,
    rules: &[BusinessRule],
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    let active: Vec<&BusinessRule> = rules.iter().filter(|r| r.is_active).collect();
    if active.is_empty() {
        return;
    }

    check_circular_co_run(&active, findings);
    check_phase_conflicts(&active, &entities.tasks, config, findings);
    if config.check_rule_references {
        check_references(&active, rules, entities, findings);
    }
}

/// Task IDs of a co-run rule, or `None` for other kinds.
fn co_run_tasks(rule: &BusinessRule) -> Option<&[String]> {
    match &rule.kind {
        RuleKind::CoRun(p) => Some(&p.task_ids),
        _ => None,
    }
}

type CoRunGraph<'a> = IndexMap<&'a str, IndexSet<&'a str>>;

/// Builds the symmetric co-run graph. Nodes and neighbours keep first-seen order.
fn co_run_graph<'a>(rules: &[&'a BusinessRule]) -> CoRunGraph<'a> {
    let mut adj: CoRunGraph<'a> = IndexMap::new();

    for ids in rules.iter().filter_map(|&r| co_run_tasks(r)) {
        for id in ids {
            adj.entry(id.as_str()).or_default();
        }
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if a == b {
                    continue;
                }
                adj.entry(a.as_str()).or_default().insert(b.as_str());
                adj.entry(b.as_str()).or_default().insert(a.as_str());
            }
        }
    }

    adj
}

/// Finds cycles with a DFS from every unvisited node.
///
/// Each back edge to a node on the current path yields one cycle: the
/// path from that node onward, closed with the node again.
pub(crate) fn find_co_run_cycles<'a>(graph: &CoRunGraph<'a>) -> Vec<Vec<&'a str>> {
    let mut visited = HashSet::new();
    let mut cycles = Vec::new();

    for &node in graph.keys() {
        if visited.insert(node) {
            collect_cycles(node, graph, &mut visited, &mut cycles);
        }
    }

    cycles
}

/// One node on the DFS path and the index of its next neighbour.
struct Frame<'a> {
    node: &'a str,
    parent: Option<&'a str>,
    next: usize,
}

/// Iterative DFS from `start`; depth is bounded by the heap, not the call stack.
fn collect_cycles<'a>(
    start: &'a str,
    graph: &CoRunGraph<'a>,
    visited: &mut HashSet<&'a str>,
    cycles: &mut Vec<Vec<&'a str>>,
) {
    let mut path: Vec<&'a str> = vec![start];
    let mut on_path: HashMap<&'a str, usize> = HashMap::from([(start, 0)]);
    let mut stack = vec![Frame {
        node: start,
        parent: None,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let next = graph
            .get(frame.node)
            .and_then(|neighbors| neighbors.get_index(frame.next))
            .copied();
        let Some(next) = next else {
            on_path.remove(frame.node);
            path.pop();
            stack.pop();
            continue;
        };
        frame.next += 1;

        if Some(next) == frame.parent {
            continue;
        }
        if let Some(&pos) = on_path.get(next) {
            // Back edge → cycle
            let mut cycle = path[pos..].to_vec();
            cycle.push(next);
            cycles.push(cycle);
        } else if visited.insert(next) {
            let parent = frame.node;
            on_path.insert(next, path.len());
            path.push(next);
            stack.push(Frame {
                node: next,
                parent: Some(parent),
                next: 0,
            });
        }
    }
}

fn check_circular_co_run(rules: &[&BusinessRule], findings: &mut Vec<ValidationFinding>) {
    let graph = co_run_graph(rules);

    for cycle in find_co_run_cycles(&graph) {
        findings.push(
            ValidationFinding::new(
                FindingKind::CircularCorunGroup,
                EntityKind::Tasks,
                format!("Circular co-run dependency: {}", cycle.join(" -> ")),
            )
            .with_entity_id(cycle[0])
            .with_suggestion("Merge overlapping co-run rules into one group"),
        );
    }
}

/// Allowed phases of one co-run member.
///
/// A phase-window rule wins, then the task's `PreferredPhases`,
/// then the configured unconstrained set.
fn allowed_phases(
    task_id: &str,
    windows: &HashMap<&str, &[Phase]>,
    tasks: &HashMap<String, &Task>,
    config: &ValidatorConfig,
) -> BTreeSet<Phase> {
    if let Some(phases) = windows.get(task_id) {
        return phases.iter().copied().collect();
    }
    match tasks.get(task_id).and_then(|t| t.preferred_phases()) {
        Some(text) => parse_preferred_phases(Some(&text)).into_iter().collect(),
        None => config.unconstrained_phases.iter().copied().collect(),
    }
}

fn check_phase_conflicts(
    rules: &[&BusinessRule],
    tasks: &[Task],
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    let mut windows: HashMap<&str, &[Phase]> = HashMap::new();
    for rule in rules {
        if let RuleKind::PhaseWindow(p) = &rule.kind {
            windows
                .entry(p.task_id.as_str())
                .or_insert(p.allowed_phases.as_slice());
        }
    }

    let mut by_id: HashMap<String, &Task> = HashMap::new();
    for task in tasks {
        if let Some(id) = task.id() {
            by_id.entry(id).or_insert(task);
        }
    }

    for rule in rules {
        let Some(ids) = co_run_tasks(rule) else {
            continue;
        };
        let mut members = ids.iter();
        let Some(first) = members.next() else {
            continue;
        };

        let mut common = allowed_phases(first, &windows, &by_id, config);
        for id in members {
            let phases = allowed_phases(id, &windows, &by_id, config);
            common.retain(|p| phases.contains(p));
        }

        if common.is_empty() {
            findings.push(
                ValidationFinding::new(
                    FindingKind::ConflictingRules,
                    EntityKind::Tasks,
                    format!(
                        "Co-run rule '{}' groups tasks [{}] that share no allowed phase",
                        rule.display_name(),
                        ids.join(", ")
                    ),
                )
                .with_suggestion(
                    "Align the phase windows or preferred phases of the grouped tasks",
                ),
            );
        }
    }
}

fn check_references(
    active: &[&BusinessRule],
    all_rules: &[BusinessRule],
    entities: &EntitySet,
    findings: &mut Vec<ValidationFinding>,
) {
    let task_ids: HashSet<String> = entities.tasks.iter().filter_map(|t| t.id()).collect();
    let worker_groups: HashSet<String> =
        entities.workers.iter().filter_map(|w| w.group()).collect();
    let client_groups: HashSet<String> =
        entities.clients.iter().filter_map(|c| c.group()).collect();
    let rule_ids: HashSet<&str> = all_rules.iter().map(|r| r.id.as_str()).collect();

    let unknown = |rule: &BusinessRule, kind: EntityKind, what: &str, name: &str| {
        ValidationFinding::new(
            FindingKind::UnknownRuleReference,
            kind,
            format!(
                "Rule '{}' references unknown {} '{}'",
                rule.display_name(),
                what,
                name
            ),
        )
        .with_entity_id(name)
        .with_suggestion("Fix the reference or deactivate the rule")
    };

    for &rule in active {
        match &rule.kind {
            RuleKind::CoRun(p) => {
                for id in p.task_ids.iter().filter(|id| !task_ids.contains(*id)) {
                    findings.push(unknown(rule, EntityKind::Tasks, "task", id.as_str()));
                }
            }
            RuleKind::PhaseWindow(p) => {
                if !task_ids.contains(&p.task_id) {
                    findings.push(unknown(rule, EntityKind::Tasks, "task", p.task_id.as_str()));
                }
            }
            RuleKind::LoadLimit(p) => {
                if !worker_groups.contains(&p.worker_group) {
                    findings.push(unknown(
                        rule,
                        EntityKind::Workers,
                        "worker group",
                        p.worker_group.as_str(),
                    ));
                }
            }
            RuleKind::SlotRestriction(p) => {
                if let Some(group) = &p.client_group {
                    if !client_groups.contains(group) {
                        findings.push(unknown(
                            rule,
                            EntityKind::Clients,
                            "client group",
                            group.as_str(),
                        ));
                    }
                }
                if let Some(group) = &p.worker_group {
                    if !worker_groups.contains(group) {
                        findings.push(unknown(
                            rule,
                            EntityKind::Workers,
                            "worker group",
                            group.as_str(),
                        ));
                    }
                }
            }
            RuleKind::PatternMatch(p) => {
                if let Err(e) = regex::Regex::new(&p.regex) {
                    findings.push(
                        ValidationFinding::new(
                            FindingKind::InvalidRulePattern,
                            EntityKind::Tasks,
                            format!(
                                "Rule '{}' has an invalid pattern: {}",
                                rule.display_name(),
                                e
                            ),
                        )
                        .with_suggestion("Correct the regular expression"),
                    );
                }
            }
            RuleKind::Precedence(p) => {
                for id in p.rule_ids.iter().filter(|id| !rule_ids.contains(id.as_str())) {
                    findings.push(unknown(rule, EntityKind::Tasks, "rule", id.as_str()));
                }
            }
        }
    }
}
