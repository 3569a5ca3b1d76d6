//! Domain models.
//!
//! Input rows are kept loosely typed ([`Record`]) because ingestion may
//! deliver numbers as strings, missing optional fields, or malformed
//! embedded formats. Rules and findings are strongly typed.
//!
//! # Domain Mappings
//!
//! | u-feasibility | Staffing | Manufacturing | Healthcare |
//! |---------------|----------|---------------|------------|
//! | Client | Customer | Order | Ward |
//! | Worker | Consultant | Machine/Operator | Nurse |
//! | Task | Engagement | Operation | Procedure |
//! | Phase | Sprint | Shift | Rota slot |

mod client;
mod entities;
mod finding;
mod record;
mod rule;
mod task;
mod worker;

pub use client::Client;
pub use entities::EntitySet;
pub use finding::{FindingKind, Severity, ValidationFinding};
pub use record::{fields, Entity, EntityKind, Record};
pub use rule::{
    BusinessRule, CoRunParams, LoadLimitParams, PatternMatchParams, PhaseWindowParams,
    PrecedenceParams, RawRule, RuleKind, RuleType, SlotRestrictionParams,
};
pub use task::Task;
pub use worker::Worker;
