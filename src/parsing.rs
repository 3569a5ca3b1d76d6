//! Tolerant parsers for string-encoded fields.
//!
//! Every parser here either returns a tagged result (`Result<_, FieldError>`)
//! or a documented fallback. Nothing panics on malformed input.
//!
//! | Field | Format | Parser |
//! |-------|--------|--------|
//! | `PriorityLevel`, `Duration`, `MaxLoadPerPhase`, `MaxConcurrent` | number or numeric text | [`parse_number`] |
//! | `RequestedTaskIDs` | comma list | [`split_list`] |
//! | `Skills`, `RequiredSkills` | comma list, case-insensitive | [`skill_set`] |
//! | `AvailableSlots` | JSON array of positive integers | [`parse_slots`] |
//! | `PreferredPhases` | JSON array or `start-end` range | [`parse_preferred_phases`] |

use serde_json::Value;
use std::collections::BTreeSet;
use tracing::trace;

use crate::error::FieldError;

/// A phase number.
pub type Phase = i64;

/// Widest `start-end` range that is expanded.
pub const MAX_PHASE_RANGE: i64 = 10_000;

/// Phase used when a task states no usable preference.
pub const DEFAULT_PHASE: Phase = 1;

/// Parses a numeric field.
///
/// - absent → `Ok(None)`
/// - JSON number → its value
/// - string → trimmed and parsed as a finite decimal
/// - anything else → [`FieldError::NotANumber`]
pub fn parse_number(value: Option<&Value>) -> Result<Option<f64>, FieldError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| FieldError::NotANumber(n.to_string())),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| FieldError::NotANumber(trimmed.to_string()))
        }
        other => Err(FieldError::NotANumber(other.to_string())),
    }
}

/// Splits a comma list into trimmed, non-empty tokens (order kept).
pub fn split_list(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Lowercased skill tokens of a comma list.
pub fn skill_set(text: &str) -> BTreeSet<String> {
    split_list(text)
        .into_iter()
        .map(str::to_lowercase)
        .collect()
}

/// Parses an available-slots value into phase numbers.
///
/// Accepts JSON array text or an already-decoded JSON array.
///
/// # Errors
/// - [`FieldError::Unparseable`]: absent, or text that is not JSON
/// - [`FieldError::NotAnArray`]: valid JSON that is not an array
/// - [`FieldError::BadValues`]: elements that are not positive integers
pub fn parse_slots(value: Option<&Value>) -> Result<Vec<Phase>, FieldError> {
    let decoded = match value {
        None | Some(Value::Null) => {
            return Err(FieldError::Unparseable("value is missing".to_string()))
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(FieldError::Unparseable("value is missing".to_string()));
            }
            serde_json::from_str::<Value>(trimmed)
                .map_err(|e| FieldError::Unparseable(e.to_string()))?
        }
        Some(other) => other.clone(),
    };

    let items = match decoded {
        Value::Array(items) => items,
        other => return Err(FieldError::NotAnArray(json_type_name(&other).to_string())),
    };

    let mut phases = Vec::with_capacity(items.len());
    let mut bad = Vec::new();
    for item in &items {
        match positive_integer(item) {
            Some(p) => phases.push(p),
            None => bad.push(item.to_string()),
        }
    }

    if bad.is_empty() {
        Ok(phases)
    } else {
        Err(FieldError::BadValues(bad))
    }
}

/// Parses a preferred-phases string.
///
/// Forms, tried in order:
/// 1. contains `[` and `]`: JSON array; integer elements kept, empty on failure
/// 2. contains `-`: `start-end`, expanded inclusively (`"2-4"` → `[2, 3, 4]`)
/// 3. otherwise: `[1]`
///
/// A range with a non-integer bound, or wider than [`MAX_PHASE_RANGE`],
/// falls back to `[1]`. `None` (no preference) also yields `[1]`.
///
/// Shared by the saturation and rule-conflict checks.
pub fn parse_preferred_phases(text: Option<&str>) -> Vec<Phase> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return vec![DEFAULT_PHASE],
    };

    if text.contains('[') && text.contains(']') {
        return match serde_json::from_str::<Vec<Value>>(text) {
            Ok(items) => items.iter().filter_map(integer).collect(),
            Err(e) => {
                trace!(raw = text, error = %e, "preferred phases are not a JSON array");
                Vec::new()
            }
        };
    }

    if let Some((start, end)) = text.split_once('-') {
        if let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>()) {
            if end.saturating_sub(start) <= MAX_PHASE_RANGE {
                return (start..=end).collect();
            }
            trace!(raw = text, "preferred phase range too wide, using default");
        } else {
            trace!(raw = text, "preferred phase range not numeric, using default");
        }
    }

    vec![DEFAULT_PHASE]
}

fn integer(value: &Value) -> Option<Phase> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

fn positive_integer(value: &Value) -> Option<Phase> {
    integer(value).filter(|&n| n > 0)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
