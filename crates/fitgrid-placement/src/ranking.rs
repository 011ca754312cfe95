//! Zone ranking for workload placement.
//!
//! Scores each zone by how many of its member nodes could individually
//! absorb a workload's aggregate demand, and produces a descending
//! ranking. Deliberately coarse and capacity-only: affinity, pinning,
//! and tainting are evaluated later, node by node, at admission time.

use tracing::debug;

use fitgrid_catalog::{Node, Service, Zone};

use crate::resources::{ResourceDemand, can_support, services_on, total_demand};

/// Number of `zone` members that could absorb `demand` on top of their
/// current usage.
pub fn qualifying_nodes(
    zone: &Zone,
    nodes: &[Node],
    catalog: &[Service],
    demand: &ResourceDemand,
) -> usize {
    nodes
        .iter()
        .filter(|node| zone.nodes.contains(&node.id))
        .filter(|node| {
            let current = total_demand(services_on(node, catalog));
            can_support(demand, &current, node)
        })
        .count()
}

/// Rank zones by their ability to absorb the given workload services.
///
/// The workload's total demand is computed once and tested against
/// every member node's remaining capacity. Zones with no qualifying
/// node are dropped; survivors are ordered by descending
/// qualifying-node count, ties broken by descending zone id (an
/// arbitrary but deterministic order, kept for compatibility).
///
/// An empty result means no zone currently fits the workload: a normal
/// outcome for the caller to surface, not an error. A non-empty result
/// is a hint, not a guarantee, since admission-level constraints still
/// apply when individual services are placed.
pub fn rank_zones<'a, I>(
    zones: &[Zone],
    nodes: &[Node],
    catalog: &[Service],
    workload_services: I,
) -> Vec<Zone>
where
    I: IntoIterator<Item = &'a Service>,
{
    let demand = total_demand(workload_services);

    let mut suitable: Vec<(usize, &Zone)> = Vec::new();
    for zone in zones {
        let free_nodes = qualifying_nodes(zone, nodes, catalog, &demand);
        if free_nodes == 0 {
            debug!(zone = %zone.name, "excluded: no node in the zone fits the workload");
            continue;
        }
        suitable.push((free_nodes, zone));
    }

    suitable.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.id.cmp(&a.1.id)));
    suitable.into_iter().map(|(_, zone)| zone.clone()).collect()
}
