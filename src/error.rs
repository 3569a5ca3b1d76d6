//! Error types.
//!
//! Two families:
//! - [`FieldError`]: a string-encoded field could not be decoded. Checks
//!   turn these into findings; they never escape [`validate`](crate::validation::validate).
//! - [`RuleError`]: a loosely-typed rule document does not match the
//!   parameter shape of its `type`. Raised when the rule is constructed.

use thiserror::Error;

/// Failure to decode a single field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The value is present but is not a finite number.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// The value is missing or is not valid JSON.
    #[error("cannot parse value: {0}")]
    Unparseable(String),

    /// The value is valid JSON but not an array.
    #[error("expected a JSON array, found {0}")]
    NotAnArray(String),

    /// The array holds elements outside the allowed domain.
    #[error("invalid elements: {}", .0.join(", "))]
    BadValues(Vec<String>),
}

/// Failure to build a [`BusinessRule`](crate::models::BusinessRule) from its raw form.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The `type` tag names no known rule kind.
    #[error("unknown rule type '{0}'")]
    UnknownType(String),

    /// `parameters` does not match the shape required by the rule type.
    #[error("invalid parameters for {rule_type} rule '{rule_id}': {source}")]
    InvalidParameters {
        rule_id: String,
        rule_type: String,
        #[source]
        source: serde_json::Error,
    },
}
