//! Resource accounting over services and nodes.
//!
//! Pure demand arithmetic: summing CPU and memory across service sets,
//! checking a demand total against a node's remaining capacity, and
//! the secondary disk-slot accounting for storage daemons.

use fitgrid_catalog::{Node, Service, Workload};

/// Aggregate CPU and memory demand for a set of services.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub struct ResourceDemand {
    /// CPU units.
    pub cpu: u32,
    /// Memory (GiB).
    pub memory: u64,
}

/// Sum per-replica demand across `services`.
///
/// The aggregate is a plain sum over the supplied sequence. Callers
/// that want replicas counted expand them into the sequence first.
pub fn total_demand<'a, I>(services: I) -> ResourceDemand
where
    I: IntoIterator<Item = &'a Service>,
{
    services
        .into_iter()
        .fold(ResourceDemand::default(), |acc, svc| ResourceDemand {
            cpu: acc.cpu.saturating_add(svc.cpu),
            memory: acc.memory.saturating_add(svc.memory),
        })
}

/// Whether `node` can absorb `demand` on top of its `current` usage.
///
/// True iff both CPU and memory stay within the node's capacity. An
/// exact fit passes.
pub fn can_support(demand: &ResourceDemand, current: &ResourceDemand, node: &Node) -> bool {
    current.cpu.saturating_add(demand.cpu) <= node.cpu_units
        && current.memory.saturating_add(demand.memory) <= node.memory
}

/// Resolve the service objects currently assigned to `node`.
///
/// Assigned IDs missing from the catalog drop out silently; keeping
/// the assigned set in step with the catalog is the consumer's job.
pub fn services_on<'a>(node: &Node, catalog: &'a [Service]) -> Vec<&'a Service> {
    catalog
        .iter()
        .filter(|svc| node.services.contains(&svc.id))
        .collect()
}

/// Current memory consumption of `node` from its assigned services
/// (GiB).
pub fn node_memory_consumption(node: &Node, catalog: &[Service]) -> u64 {
    total_demand(services_on(node, catalog)).memory
}

/// Number of storage-daemon services assigned to `node`.
///
/// Storage daemons are identified by name convention — an "OSD"
/// substring, case-insensitive. Each one consumes a disk slot.
pub fn storage_daemons_on(node: &Node, catalog: &[Service]) -> usize {
    services_on(node, catalog)
        .iter()
        .filter(|svc| svc.name.to_uppercase().contains("OSD"))
        .count()
}

/// Whether `node` has a disk slot for every storage daemon assigned
/// to it.
///
/// Best-effort secondary check layered on top of the CPU/memory
/// predicate. Admission does not consult it; callers that model
/// disk-bound services enforce it themselves.
pub fn within_disk_budget(node: &Node, catalog: &[Service]) -> bool {
    storage_daemons_on(node, catalog) <= node.max_disks as usize
}

/// Highest zone-replication count across `services`. Zero for an
/// empty set.
pub fn max_zones(services: &[Service]) -> u32 {
    services.iter().map(|svc| svc.zones).max().unwrap_or(0)
}

/// Resolve the member services of `workload`.
pub fn workload_services<'a>(workload: &Workload, catalog: &'a [Service]) -> Vec<&'a Service> {
    catalog.iter().filter(|svc| workload.owns(svc.id)).collect()
}

/// Aggregate demand of a workload's member services.
pub fn workload_demand(workload: &Workload, catalog: &[Service]) -> ResourceDemand {
    total_demand(workload_services(workload, catalog))
}
