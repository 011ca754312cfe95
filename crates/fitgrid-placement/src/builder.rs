//! Node construction from machine-set templates.
//!
//! The factory turns a [`MachineSet`] template into a platform-typed
//! [`Node`]. Capacity fields and the node label come straight from the
//! template; cloud platforms additionally carry the template's
//! instance-size label in their variant.

use fitgrid_catalog::{
    ContractViolation, MachineSet, Node, NodeVariant, PlanResult, Platform, Workload,
};

/// Machine set used for workloads that do not pin one.
const DEFAULT_MACHINE_SET: &str = "default";

/// Build a node from a machine-set template for the given platform.
///
/// The produced node inherits the template's `only_for` allow-list,
/// starts with no assigned services, and carries `id` zero; the
/// consumer assigns identifiers when it adopts the node into its
/// topology. The match over [`Platform`] is exhaustive. VMware and RHV
/// both produce the virtualized variant.
pub fn build_node(template: &MachineSet, platform: Platform) -> Node {
    let variant = match platform {
        Platform::BareMetal => NodeVariant::BareMetal,
        Platform::Aws => NodeVariant::Aws {
            instance_type: template.instance_name.clone(),
        },
        Platform::Gcp => NodeVariant::Gcp {
            instance_type: template.instance_name.clone(),
        },
        Platform::Azure => NodeVariant::Azure {
            instance_type: template.instance_name.clone(),
        },
        Platform::Vmware | Platform::Rhv => NodeVariant::Virtualized,
    };

    Node {
        id: 0,
        cpu_units: template.cpu,
        memory: template.memory,
        max_disks: template.number_of_disks,
        machine_set: template.name.clone(),
        label: template.label.clone(),
        only_for: template.only_for.clone(),
        services: Vec::new(),
        variant,
    }
}

/// Nodes belonging to the named machine set.
pub fn machine_set_nodes<'a>(set_name: &str, nodes: &'a [Node]) -> Vec<&'a Node> {
    nodes
        .iter()
        .filter(|node| node.machine_set == set_name)
        .collect()
}

/// Machine sets `workload` is allowed to use.
///
/// A set with a non-empty `only_for` list is an allow-list: only the
/// named workloads may use it. An empty list means unrestricted.
pub fn suitable_machine_sets<'a>(
    workload: &Workload,
    machine_sets: &'a [MachineSet],
) -> Vec<&'a MachineSet> {
    machine_sets
        .iter()
        .filter(|set| set.only_for.is_empty() || set.only_for.contains(&workload.name))
        .collect()
}

/// Build a node for `workload` from its pinned machine set, or from
/// the `"default"` set when it is unpinned.
///
/// A pin list naming no known machine set, or a missing default set,
/// is a contract violation: machine sets are created before workloads
/// reference them.
pub fn node_for_workload(
    workload: &Workload,
    machine_sets: &[MachineSet],
    platform: Platform,
) -> PlanResult<Node> {
    let template = if workload.uses_machines.is_empty() {
        machine_sets.iter().find(|set| set.name == DEFAULT_MACHINE_SET)
    } else {
        machine_sets
            .iter()
            .find(|set| workload.uses_machines.contains(&set.name))
    };

    let Some(template) = template else {
        let wanted = workload
            .uses_machines
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_MACHINE_SET);
        return Err(ContractViolation::UnknownMachineSet(wanted.to_string()));
    };

    Ok(build_node(template, platform))
}
