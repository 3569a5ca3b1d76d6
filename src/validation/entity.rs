//! Per-entity checks.
//!
//! Each check scans one collection once, in input order. Shared checks
//! (required columns, unique IDs) are generic over [`Entity`].

use serde_json::Value;
use std::collections::HashSet;

use crate::error::FieldError;
use crate::models::{fields, Client, Entity, FindingKind, Task, ValidationFinding, Worker};
use crate::parsing::{parse_number, parse_slots};

use super::ValidatorConfig;

pub(crate) fn check_clients(
    clients: &[Client],
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    check_required_columns(clients, findings);
    check_unique_ids(clients, findings);
    for client in clients {
        check_priority(client, config, findings);
    }
    for client in clients {
        check_attributes(client, findings);
    }
}

pub(crate) fn check_workers(workers: &[Worker], findings: &mut Vec<ValidationFinding>) {
    check_required_columns(workers, findings);
    check_unique_ids(workers, findings);
    for worker in workers {
        check_slots(worker, findings);
    }
    for worker in workers {
        check_max_load(worker, findings);
    }
}

pub(crate) fn check_tasks(
    tasks: &[Task],
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    check_required_columns(tasks, findings);
    check_unique_ids(tasks, findings);
    for task in tasks {
        check_duration(task, config, findings);
    }
    for task in tasks {
        check_max_concurrent(task, findings);
    }
}

/// The first record's keys stand in for the collection's schema.
fn check_required_columns<E: Entity>(items: &[E], findings: &mut Vec<ValidationFinding>) {
    let Some(first) = items.first() else {
        return;
    };
    let missing: Vec<&str> = E::KIND
        .required_fields()
        .iter()
        .copied()
        .filter(|field| !first.record().has_field(field))
        .collect();

    if !missing.is_empty() {
        findings.push(
            ValidationFinding::new(
                FindingKind::MissingColumns,
                E::KIND,
                format!(
                    "Missing required columns in {}: {}",
                    E::KIND,
                    missing.join(", ")
                ),
            )
            .with_suggestion(format!("Add the columns {} to the file", missing.join(", "))),
        );
    }
}

fn check_unique_ids<E: Entity>(items: &[E], findings: &mut Vec<ValidationFinding>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for item in items {
        let Some(id) = item.id() else {
            continue;
        };
        if !seen.insert(id.clone()) && reported.insert(id.clone()) {
            findings.push(
                ValidationFinding::new(
                    FindingKind::DuplicateId,
                    E::KIND,
                    format!("Duplicate {} ID: {}", E::KIND.label(), id),
                )
                .with_entity_id(id)
                .with_field(E::KIND.id_field())
                .with_suggestion("Give every row a unique ID"),
            );
        }
    }
}

fn check_priority(
    client: &Client,
    config: &ValidatorConfig,
    findings: &mut Vec<ValidationFinding>,
) {
    let (min, max) = (config.min_priority, config.max_priority);
    let problem = match parse_number(client.record().get(fields::PRIORITY_LEVEL)) {
        Ok(None) => return,
        Ok(Some(p)) if p.fract() == 0.0 && p >= min as f64 && p <= max as f64 => return,
        Ok(Some(p)) => format!("PriorityLevel {p} is outside {min}-{max}"),
        Err(e) => format!("PriorityLevel {e}"),
    };

    findings.push(
        entity_finding(FindingKind::InvalidPriority, client, problem)
            .with_field(fields::PRIORITY_LEVEL)
            .with_suggestion(format!("Use an integer between {min} and {max}")),
    );
}

fn check_attributes(client: &Client, findings: &mut Vec<ValidationFinding>) {
    let text = match client.record().value(fields::ATTRIBUTES_JSON) {
        // Objects and arrays were already decoded by ingestion.
        None | Some(Value::Object(_)) | Some(Value::Array(_)) => return,
        Some(Value::String(raw)) => raw.trim().to_string(),
        Some(scalar) => scalar.to_string(),
    };
    let text = text.as_str();

    if text.starts_with('{') || text.starts_with('[') {
        if let Err(e) = serde_json::from_str::<Value>(text) {
            findings.push(
                entity_finding(
                    FindingKind::InvalidJson,
                    client,
                    format!("AttributesJSON is not valid JSON: {e}"),
                )
                .with_field(fields::ATTRIBUTES_JSON)
                .with_suggestion("Fix the JSON syntax (quotes, commas, brackets)"),
            );
        }
    } else {
        findings.push(
            entity_finding(
                FindingKind::NonJsonAttributes,
                client,
                "AttributesJSON holds plain text instead of JSON",
            )
            .with_field(fields::ATTRIBUTES_JSON)
            .with_suggestion(format!(
                "Wrap the text in a JSON object, e.g. {{\"note\": {}}}",
                Value::from(text)
            )),
        );
    }
}

fn check_slots(worker: &Worker, findings: &mut Vec<ValidationFinding>) {
    if !worker.record().has_field(fields::AVAILABLE_SLOTS) {
        // Left to the required-columns check.
        return;
    }
    let Err(err) = parse_slots(worker.slots()) else {
        return;
    };
    let (kind, suggestion) = match &err {
        FieldError::NotAnArray(_) => (
            FindingKind::InvalidSlotsFormat,
            "AvailableSlots must be an array such as [1,2,3]",
        ),
        FieldError::BadValues(_) => (
            FindingKind::InvalidSlotValues,
            "Phase numbers must be positive integers",
        ),
        FieldError::Unparseable(_) | FieldError::NotANumber(_) => (
            FindingKind::UnparseableSlots,
            "Write AvailableSlots as a JSON array such as [1,2,3]",
        ),
    };

    findings.push(
        entity_finding(kind, worker, format!("AvailableSlots: {err}"))
            .with_field(fields::AVAILABLE_SLOTS)
            .with_suggestion(suggestion),
    );
}

fn check_max_load(worker: &Worker, findings: &mut Vec<ValidationFinding>) {
    let problem = match parse_number(worker.max_load()) {
        Ok(None) => return,
        Ok(Some(m)) if m >= 0.0 => return,
        Ok(Some(m)) => format!("MaxLoadPerPhase {m} is negative"),
        Err(e) => format!("MaxLoadPerPhase {e}"),
    };

    findings.push(
        entity_finding(FindingKind::InvalidMaxLoad, worker, problem)
            .with_field(fields::MAX_LOAD_PER_PHASE)
            .with_suggestion("Use a whole number of 0 or more"),
    );
}

fn check_duration(task: &Task, config: &ValidatorConfig, findings: &mut Vec<ValidationFinding>) {
    let min = config.min_duration;
    let problem = match parse_number(task.duration()) {
        Ok(None) => return,
        Ok(Some(d)) if d >= min => return,
        Ok(Some(d)) => format!("Duration {d} is below the minimum of {min}"),
        Err(e) => format!("Duration {e}"),
    };

    findings.push(
        entity_finding(FindingKind::InvalidDuration, task, problem)
            .with_field(fields::DURATION)
            .with_suggestion(format!("Use a number of at least {min}")),
    );
}

fn check_max_concurrent(task: &Task, findings: &mut Vec<ValidationFinding>) {
    let problem = match parse_number(task.max_concurrent()) {
        Ok(None) => return,
        Ok(Some(n)) if n >= 1.0 => return,
        Ok(Some(n)) => format!("MaxConcurrent {n} is below 1"),
        Err(e) => format!("MaxConcurrent {e}"),
    };

    findings.push(
        entity_finding(FindingKind::InvalidMaxConcurrent, task, problem)
            .with_field(fields::MAX_CONCURRENT)
            .with_suggestion("Use a whole number of 1 or more"),
    );
}

/// A finding scoped to one entity (ID attached when present).
pub(crate) fn entity_finding<E: Entity>(
    kind: FindingKind,
    entity: &E,
    message: impl Into<String>,
) -> ValidationFinding {
    let finding = ValidationFinding::new(kind, E::KIND, message);
    match entity.id() {
        Some(id) => finding.with_entity_id(id),
        None => finding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, Record, Severity};

    fn kinds(findings: &[ValidationFinding]) -> Vec<&str> {
        findings.iter().map(|f| f.kind.as_str()).collect()
    }

    fn full_client(id: &str) -> Client {
        Client::new(id)
            .with_name("Acme")
            .with_priority(3)
            .with_requested_tasks("T1")
    }

    fn full_worker(id: &str) -> Worker {
        Worker::new(id)
            .with_name("Alice")
            .with_skills("rust")
            .with_slots("[1,2]")
            .with_max_load(1)
    }

    fn full_task(id: &str) -> Task {
        Task::new(id)
            .with_name("Build")
            .with_duration(1)
            .with_required_skills("rust")
    }

    #[test]
    fn test_clean_collections() {
        let mut findings = Vec::new();
        let config = ValidatorConfig::default();
        check_clients(&[full_client("C1"), full_client("C2")], &config, &mut findings);
        check_workers(&[full_worker("W1")], &mut findings);
        check_tasks(&[full_task("T1")], &config, &mut findings);
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn test_missing_columns_uses_first_record() {
        let mut findings = Vec::new();
        let clients = vec![Client::new("C1"), full_client("C2")];
        check_clients(&clients, &ValidatorConfig::default(), &mut findings);

        assert_eq!(kinds(&findings), vec!["missing_columns"]);
        let f = &findings[0];
        assert_eq!(f.entity_type, EntityKind::Clients);
        assert!(f.entity_id.is_none());
        assert!(f
            .message
            .contains("ClientName, PriorityLevel, RequestedTaskIDs"));

        // Schema drift after the first row is not caught.
        let mut findings = Vec::new();
        let clients = vec![full_client("C1"), Client::new("C2")];
        check_clients(&clients, &ValidatorConfig::default(), &mut findings);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_duplicate_ids_reported_once_per_value() {
        let mut findings = Vec::new();
        let tasks = vec![
            full_task("T1"),
            full_task("T2"),
            full_task("T1"),
            full_task("T1"),
            full_task("T2"),
        ];
        check_tasks(&tasks, &ValidatorConfig::default(), &mut findings);

        let ids: Vec<_> = findings
            .iter()
            .map(|f| f.entity_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert!(findings.iter().all(|f| f.kind == FindingKind::DuplicateId));
    }

    #[test]
    fn test_priority_bounds() {
        let config = ValidatorConfig::default();
        for (value, invalid) in [(1, false), (5, false), (0, true), (6, true)] {
            let mut findings = Vec::new();
            check_clients(&[full_client("C1").with_priority(value)], &config, &mut findings);
            assert_eq!(findings.len(), usize::from(invalid), "priority {value}");
        }

        let mut findings = Vec::new();
        check_clients(&[full_client("C1").with_priority("high")], &config, &mut findings);
        assert_eq!(kinds(&findings), vec!["invalid_priority"]);
        assert!(findings[0].message.contains("'high' is not a number"));

        let mut findings = Vec::new();
        check_clients(&[full_client("C1").with_priority("4")], &config, &mut findings);
        assert!(findings.is_empty());

        let mut findings = Vec::new();
        check_clients(&[full_client("C1").with_priority(2.5)], &config, &mut findings);
        assert_eq!(kinds(&findings), vec!["invalid_priority"]);
    }

    #[test]
    fn test_attributes() {
        let config = ValidatorConfig::default();
        let clients = vec![
            full_client("C1").with_attributes(r#"{"vip": true}"#),
            full_client("C2").with_attributes(r#"{"vip": tru"#),
            full_client("C3").with_attributes("loyal customer"),
            full_client("C4").with_attributes("[1,2]"),
            full_client("C5").with_field(fields::ATTRIBUTES_JSON, 42),
            full_client("C6").with_field(fields::ATTRIBUTES_JSON, true),
            full_client("C7").with_field(fields::ATTRIBUTES_JSON, serde_json::json!({"vip": 1})),
        ];
        let mut findings = Vec::new();
        check_clients(&clients, &config, &mut findings);

        assert_eq!(
            kinds(&findings),
            vec![
                "invalid_json",
                "non_json_attributes",
                "non_json_attributes",
                "non_json_attributes"
            ]
        );
        assert_eq!(findings[2].entity_id.as_deref(), Some("C5"));
        assert_eq!(findings[3].entity_id.as_deref(), Some("C6"));
        assert_eq!(findings[0].entity_id.as_deref(), Some("C2"));
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[1].entity_id.as_deref(), Some("C3"));
        assert_eq!(findings[1].severity, Severity::Warning);
    }

    #[test]
    fn test_slot_sub_types() {
        let workers = vec![
            full_worker("W1").with_slots("[1,2"),
            full_worker("W2").with_slots("{\"a\": 1}"),
            full_worker("W3").with_slots("[1, 0]"),
            full_worker("W4").with_slots("[3]"),
        ];
        let mut findings = Vec::new();
        check_workers(&workers, &mut findings);

        assert_eq!(
            kinds(&findings),
            vec!["unparseable_slots", "invalid_slots_format", "invalid_slot_values"]
        );
    }

    #[test]
    fn test_max_load() {
        let workers = vec![
            full_worker("W1").with_max_load("two"),
            full_worker("W2").with_max_load(-1),
            full_worker("W3").with_max_load(0),
        ];
        let mut findings = Vec::new();
        check_workers(&workers, &mut findings);
        assert_eq!(kinds(&findings), vec!["invalid_max_load", "invalid_max_load"]);
    }

    #[test]
    fn test_duration_bounds() {
        let config = ValidatorConfig::default();
        let tasks = vec![
            full_task("T1").with_duration(1),
            full_task("T2").with_duration(0),
            full_task("T3").with_duration("soon"),
            full_task("T4").with_duration("3"),
        ];
        let mut findings = Vec::new();
        check_tasks(&tasks, &config, &mut findings);

        assert_eq!(kinds(&findings), vec!["invalid_duration", "invalid_duration"]);
        assert_eq!(findings[0].entity_id.as_deref(), Some("T2"));
        assert_eq!(findings[1].entity_id.as_deref(), Some("T3"));
    }

    #[test]
    fn test_per_check_order() {
        // Every priority finding precedes every attribute finding.
        let clients = vec![
            full_client("C1").with_attributes("plain"),
            full_client("C2").with_priority(9),
        ];
        let mut findings = Vec::new();
        check_clients(&clients, &ValidatorConfig::default(), &mut findings);
        assert_eq!(kinds(&findings), vec!["invalid_priority", "non_json_attributes"]);
    }

    #[test]
    fn test_entity_without_id() {
        let task = Task::from_record(Record::new().with(fields::DURATION, 0));
        let f = entity_finding(FindingKind::InvalidDuration, &task, "bad");
        assert!(f.entity_id.is_none());
    }
}
