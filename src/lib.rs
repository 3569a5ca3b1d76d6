//! Data validation and rule-consistency checking for scheduling inputs.
//!
//! Takes client, worker and task records plus user-defined business
//! rules, and reports every structural problem, broken reference and
//! rule contradiction that would make an assignment infeasible. It never
//! assigns or schedules anything itself.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Client`, `Worker`, `Task` (loosely-typed
//!   rows), `BusinessRule` (typed rule variants), `ValidationFinding`
//! - **`parsing`**: Tolerant parsers for string-encoded fields
//!   (slot arrays, phase ranges, comma lists)
//! - **`validation`**: The engine (`validate`, `Validator`) and
//!   `ValidationSummary`
//! - **`error`**: Field and rule construction errors
//!
//! # Architecture
//!
//! This crate sits at Layer 3 (Frameworks) in the U-Engine ecosystem,
//! next to the scheduling framework. It is a pure function over its
//! inputs: no I/O, no shared state between calls.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22

pub mod error;
pub mod models;
pub mod parsing;
pub mod validation;

pub use validation::{validate, ValidationSummary, Validator, ValidatorConfig};
