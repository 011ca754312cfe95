//! fitgrid-placement — the FitGrid capacity planner's decision engine.
//!
//! Answers "can this service legally land on this node?" and "which
//! zone best absorbs this workload?" over caller-supplied entity
//! snapshots. Every operation is a synchronous, read-only projection:
//! nothing here mutates the snapshot or holds state between calls, so
//! repeated calls against an unchanged snapshot are deterministic.
//!
//! A negative answer (`Ok(false)` from admission, an empty ranking)
//! is a normal outcome meaning "no valid placement", not an error.
//!
//! # Components
//!
//! - **`resources`** — demand totals, the capacity predicate, disk-slot accounting
//! - **`builder`** — node construction from machine-set templates
//! - **`admission`** — the per-node admission predicate
//! - **`ranking`** — zone ranking for whole workloads

pub mod admission;
pub mod builder;
pub mod ranking;
pub mod resources;

pub use admission::can_admit;
pub use builder::{build_node, machine_set_nodes, node_for_workload, suitable_machine_sets};
pub use ranking::{qualifying_nodes, rank_zones};
pub use resources::{
    ResourceDemand, can_support, max_zones, node_memory_consumption, services_on,
    storage_daemons_on, total_demand, within_disk_budget, workload_demand, workload_services,
};
