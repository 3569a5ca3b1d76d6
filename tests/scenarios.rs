//! End-to-end scenarios built from loosely-typed JSON rows.

use serde_json::{json, Value};
use u_feasibility::models::{BusinessRule, EntitySet, FindingKind, Severity, ValidationFinding};
use u_feasibility::validate;

fn entities(value: Value) -> EntitySet {
    serde_json::from_value(value).unwrap()
}

fn rules(value: Value) -> Vec<BusinessRule> {
    serde_json::from_value(value).unwrap()
}

fn find<'a>(findings: &'a [ValidationFinding], kind: &str) -> Vec<&'a ValidationFinding> {
    findings.iter().filter(|f| f.kind.as_str() == kind).collect()
}

#[test]
fn priority_out_of_range() {
    let input = entities(json!({
        "clients": [{"ClientID": "C1", "PriorityLevel": 7, "RequestedTaskIDs": "T1"}],
        "tasks": [{"TaskID": "T1", "Duration": 1, "RequiredSkills": ""}]
    }));
    let findings = validate(&input, &[]);

    let hits = find(&findings, "invalid_priority");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity_id.as_deref(), Some("C1"));
    assert_eq!(hits[0].field.as_deref(), Some("PriorityLevel"));
}

#[test]
fn worker_with_fewer_slots_than_load() {
    let input = entities(json!({
        "workers": [{"WorkerID": "W1", "AvailableSlots": "[1,2]", "MaxLoadPerPhase": 5}]
    }));
    let findings = validate(&input, &[]);

    let hits = find(&findings, "overloaded_worker");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity_id.as_deref(), Some("W1"));
}

#[test]
fn unknown_requested_task() {
    let input = entities(json!({
        "clients": [{"ClientID": "C1", "RequestedTaskIDs": "T9"}],
        "tasks": [{"TaskID": "T1"}]
    }));
    let findings = validate(&input, &[]);

    let hits = find(&findings, "missing_task_references");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity_id.as_deref(), Some("C1"));
    assert!(hits[0].message.contains("T9"));
}

#[test]
fn three_way_co_run_is_circular() {
    let rule_set = rules(json!([{
        "id": "R1",
        "type": "coRun",
        "name": "Trio",
        "description": "",
        "parameters": {"taskIds": ["T1", "T2", "T3"]},
        "isActive": true,
        "createdAt": "2024-01-01T00:00:00Z"
    }]));
    let findings = validate(&EntitySet::new(), &rule_set);

    assert!(!find(&findings, "circular_corun_group").is_empty());
}

#[test]
fn co_run_against_phase_window() {
    let input = entities(json!({
        "tasks": [
            {"TaskID": "T1", "Duration": 1},
            {"TaskID": "T2", "Duration": 1, "PreferredPhases": "2-3"}
        ]
    }));
    let rule_set = rules(json!([
        {"id": "R1", "type": "coRun", "parameters": {"taskIds": ["T1", "T2"]}},
        {"id": "R2", "type": "phaseWindow", "parameters": {"taskId": "T1", "allowedPhases": [1]}}
    ]));
    let findings = validate(&input, &rule_set);

    assert_eq!(find(&findings, "conflicting_rules").len(), 1);
    assert!(find(&findings, "circular_corun_group").is_empty());
}

#[test]
fn demand_without_workers_saturates_each_phase() {
    let input = entities(json!({
        "tasks": [{"TaskID": "T1", "Duration": 5, "PreferredPhases": "1-2"}]
    }));
    let findings = validate(&input, &[]);

    let hits = find(&findings, "phase_slot_saturation");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].message.contains("Phase 1"));
    assert!(hits[1].message.contains("Phase 2"));
    for hit in hits {
        assert!(hit.message.contains("demand 5"));
        assert!(hit.message.contains("capacity 0"));
    }
}

#[test]
fn boundary_values() {
    let row = |priority: Value, duration: Value| {
        entities(json!({
            "clients": [{
                "ClientID": "C1", "ClientName": "A", "PriorityLevel": priority,
                "RequestedTaskIDs": "T1"
            }],
            "workers": [{
                "WorkerID": "W1", "WorkerName": "W", "Skills": "x",
                "AvailableSlots": "[1]", "MaxLoadPerPhase": 1
            }],
            "tasks": [{
                "TaskID": "T1", "TaskName": "T", "Duration": duration,
                "RequiredSkills": "x"
            }]
        }))
    };

    assert!(validate(&row(json!(1), json!(1)), &[]).is_empty());
    assert!(validate(&row(json!(5), json!(1)), &[]).is_empty());

    for bad in [json!(0), json!(6)] {
        let findings = validate(&row(bad, json!(1)), &[]);
        assert_eq!(find(&findings, "invalid_priority").len(), 1);
    }
    let findings = validate(&row(json!(3), json!(0)), &[]);
    assert_eq!(find(&findings, "invalid_duration").len(), 1);
}

#[test]
fn numbers_as_strings_are_accepted() {
    let input = entities(json!({
        "clients": [{
            "ClientID": "C1", "ClientName": "A", "PriorityLevel": "2",
            "RequestedTaskIDs": "T1"
        }],
        "workers": [{
            "WorkerID": "W1", "WorkerName": "W", "Skills": "x",
            "AvailableSlots": "[1, 2]", "MaxLoadPerPhase": "1"
        }],
        "tasks": [{
            "TaskID": "T1", "TaskName": "T", "Duration": "1",
            "RequiredSkills": "X", "PreferredPhases": "[1]"
        }]
    }));
    assert!(validate(&input, &[]).is_empty());
}

#[test]
fn unparseable_slots_are_reported_once() {
    let input = entities(json!({
        "workers": [{
            "WorkerID": "W1", "WorkerName": "W", "Skills": "x",
            "AvailableSlots": "1,2,3", "MaxLoadPerPhase": 9
        }],
        "tasks": [{"TaskID": "T1", "TaskName": "T", "Duration": 1, "RequiredSkills": "x"}]
    }));
    let findings = validate(&input, &[]);

    assert_eq!(find(&findings, "unparseable_slots").len(), 1);
    assert!(find(&findings, "overloaded_worker").is_empty());
    // The worker's capacity is unknown, so phase 1 is short.
    assert_eq!(find(&findings, "phase_slot_saturation").len(), 1);
}

#[test]
fn finding_list_serializes_for_renderers() {
    let input = entities(json!({
        "clients": [{
            "ClientID": "C1", "ClientName": "A", "PriorityLevel": 3,
            "RequestedTaskIDs": "", "AttributesJSON": "gold tier"
        }]
    }));
    let findings = validate(&input, &[]);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(findings[0].kind, FindingKind::NonJsonAttributes);

    let wire = serde_json::to_value(&findings).unwrap();
    assert_eq!(wire[0]["type"], "non_json_attributes");
    assert_eq!(wire[0]["entityType"], "clients");
    assert_eq!(wire[0]["entityId"], "C1");
    assert_eq!(wire[0]["field"], "AttributesJSON");
}

#[test]
fn malformed_rule_is_rejected_at_construction() {
    let result = serde_json::from_value::<Vec<BusinessRule>>(json!([
        {"id": "R1", "type": "phaseWindow", "parameters": {"taskId": "T1"}}
    ]));
    assert!(result.is_err());
}

#[test]
fn long_co_run_chain_completes() {
    let rule_set: Vec<BusinessRule> = (0..50_000)
        .map(|i| BusinessRule::co_run(format!("R{i}"), [format!("T{i}"), format!("T{}", i + 1)]))
        .collect();
    let findings = validate(&EntitySet::new(), &rule_set);

    assert!(find(&findings, "circular_corun_group").is_empty());
    assert_eq!(find(&findings, "unknown_rule_reference").len(), 100_000);
}
