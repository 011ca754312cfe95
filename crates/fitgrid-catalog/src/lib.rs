//! fitgrid-catalog — entity types for the FitGrid capacity planner.
//!
//! Holds the serializable domain types the planning engine reads:
//! services, workloads, machine-set templates, nodes, and zones. The
//! collections themselves are owned and mutated by the consuming store
//! layer; the engine only ever sees them as immutable snapshots.
//!
//! All types are JSON-serializable so the consumer can snapshot and
//! restore planning sessions.

pub mod error;
pub mod types;

pub use error::{ContractViolation, PlanResult};
pub use types::*;
